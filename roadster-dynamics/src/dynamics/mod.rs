use std::sync::Arc;

use glam::DVec3;

use roadster_core::driver_inputs::DriverInputs;
use roadster_core::gear::Gear;
use roadster_core::vehicle_spec::VehicleSpec;
use roadster_core::GLOBAL_CONFIG;

use crate::error::DynamicsError;

pub mod aero;
pub mod constants;
pub mod curve;
pub mod drivetrain;
pub mod engine;
pub mod tire;


use drivetrain::DrivetrainState;
use engine::EngineState;
use tire::TireState;

pub const WHEEL_COUNT: usize = 4;
// wheel indexing into per-wheel arrays
pub const FRONT_LEFT: usize = 0;
pub const FRONT_RIGHT: usize = 1;
pub const REAR_LEFT: usize = 2;
pub const REAR_RIGHT: usize = 3;

/// Ambient conditions the host supplies per tick. Not part of any
/// vehicle's spec; two vehicles in the same world share one of these.
#[derive(Copy, Clone, Debug)]
pub struct Environment {
    /// kg/m^3
    pub air_density: f64,
    /// m/s^2
    pub gravity: f64,
}

impl Default for Environment {
    fn default() -> Environment {
        Environment {
            air_density: GLOBAL_CONFIG.air_density,
            gravity: GLOBAL_CONFIG.gravity,
        }
    }
}

// TickInput is everything the integrator knows that the core needs:
// driver controls plus the rigid body state the integrator owns
#[derive(Copy, Clone, Debug)]
pub struct TickInput {
    pub driver: DriverInputs,
    /// wheel angular velocities, rad/s, indexed FRONT_LEFT..=REAR_RIGHT
    pub wheel_speeds: [f64; WHEEL_COUNT],
    /// body-frame velocity, m/s: +x forward, +y up, +z to the driver's left
    pub velocity: DVec3,
    /// rad/s about the up axis, positive counterclockwise seen from above
    pub yaw_rate: f64,
}

impl TickInput {
    /// A vehicle at rest with the driver doing nothing.
    pub fn at_rest() -> TickInput {
        TickInput {
            driver: DriverInputs::neutral(),
            wheel_speeds: [0.0; WHEEL_COUNT],
            velocity: DVec3::ZERO,
            yaw_rate: 0.0,
        }
    }
}

/// What one tick hands back to the integrator. Forces are in the body
/// frame; the integrator combines them with whatever track and collision
/// forces it gathers elsewhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DynamicsOutput {
    /// net force along +x (tractive minus braking minus drag), N
    pub longitudinal_force: f64,
    /// net force along +z, N
    pub lateral_force: f64,
    /// torque about the up axis, Nm, positive counterclockwise from above
    pub yaw_torque: f64,
    /// torque at the driven axle after gearing, Nm; zero mid-shift
    pub wheel_torque: f64,
    /// crank speed after this tick
    pub rpm: f64,
    pub gear: Gear,
    pub is_shifting: bool,
}

/// Owns every piece of mutable state for one simulated vehicle. The spec
/// is shared read-only between instances of the same model; runtime state
/// never is, so a host may tick its vehicles from independent workers.
#[derive(Clone)]
pub struct VehicleInstance {
    spec: Arc<VehicleSpec>,
    engine: EngineState,
    drivetrain: DrivetrainState,
    tires: [TireState; WHEEL_COUNT],
}

impl VehicleInstance {
    pub fn new(spec: Arc<VehicleSpec>) -> VehicleInstance {
        VehicleInstance {
            engine: EngineState::at_idle(&spec),
            drivetrain: DrivetrainState::in_neutral(),
            tires: [TireState::default(); WHEEL_COUNT],
            spec,
        }
    }

    pub fn spec(&self) -> &VehicleSpec {
        &self.spec
    }

    pub fn gear(&self) -> Gear {
        self.drivetrain.current_gear()
    }

    pub fn rpm(&self) -> f64 {
        self.engine.rpm
    }

    pub fn is_shifting(&self) -> bool {
        self.drivetrain.is_shifting()
    }

    pub fn tires(&self) -> &[TireState; WHEEL_COUNT] {
        &self.tires
    }

    /// Current engine power in kW, for gauges.
    pub fn power_output(&self) -> Result<f64, DynamicsError> {
        self.engine.power_output(&self.spec)
    }

    pub fn request_shift(&mut self, target: Gear) -> Result<(), DynamicsError> {
        self.drivetrain.request_shift(&self.spec, target)
    }

    /// Let the gearbox pick its own gears this tick, street-automatic
    /// style. Hosts modelling a manual box just never call this.
    pub fn auto_shift(&mut self) -> Result<(), DynamicsError> {
        self.drivetrain.auto_shift(&self.spec, self.engine.rpm)
    }

    /// Advance one simulation step. Pure function of current state plus
    /// inputs: identical (state, input, dt) always produces identical
    /// output, which replay and the tests below rely on.
    pub fn tick(
        &mut self,
        input: &TickInput,
        dt: f64,
        environment: &Environment,
    ) -> Result<DynamicsOutput, DynamicsError> {
        let spec = &*self.spec;
        let driver = input.driver.clamped();
        self.engine.throttle = driver.throttle;

        // let any in-flight shift mature
        self.drivetrain.tick(dt);

        // crank speed: wheel-driven while the clutch is engaged,
        // free-revving in neutral or mid-shift
        let coupled =
            !self.drivetrain.is_shifting() && self.drivetrain.current_gear() != Gear::Neutral;
        if coupled {
            let driven_omega =
                0.5 * (input.wheel_speeds[REAR_LEFT] + input.wheel_speeds[REAR_RIGHT]);
            let implied = self.drivetrain.engine_rpm_from_wheel_speed(spec, driven_omega);
            self.engine.couple_to_wheels(spec, implied);
        } else {
            self.engine.free_rev(spec, dt);
        }

        // crank torque through the box to the driven axle
        let engine_torque = self.engine.torque_output(spec)?;
        let wheel_torque = self.drivetrain.wheel_torque(spec, engine_torque);

        // static load split; the axle closer to the center of mass
        // carries more
        let axle_span = spec.geometry.front_wheels_offset + spec.geometry.rear_wheels_offset;
        let front_axle_load =
            spec.mass * environment.gravity * spec.geometry.rear_wheels_offset / axle_span;
        let rear_axle_load =
            spec.mass * environment.gravity * spec.geometry.front_wheels_offset / axle_span;
        self.tires[FRONT_LEFT].normal_load = front_axle_load / 2.0;
        self.tires[FRONT_RIGHT].normal_load = front_axle_load / 2.0;
        self.tires[REAR_LEFT].normal_load = rear_axle_load / 2.0;
        self.tires[REAR_RIGHT].normal_load = rear_axle_load / 2.0;

        // longitudinal slip per wheel: patch velocity relative to the
        // ground, normalized
        let v_long = input.velocity.x;
        for i in 0..WHEEL_COUNT {
            let surface_speed = input.wheel_speeds[i] * spec.wheels.radius;
            let denom = v_long
                .abs()
                .max(surface_speed.abs())
                .max(constants::SLIP_SPEED_FLOOR);
            self.tires[i].longitudinal_slip = (v_long - surface_speed) / denom;
        }

        // lateral slip per axle via the bicycle model, with the steering
        // angle clamped mechanically and by grip
        let steering = tire::effective_steering_angle(
            spec,
            input.velocity.length(),
            driver.steering_angle,
            environment.gravity,
        );
        let (front_slip, rear_slip) =
            tire::axle_lateral_slips(spec, v_long, input.velocity.z, input.yaw_rate, steering);
        self.tires[FRONT_LEFT].lateral_slip = front_slip;
        self.tires[FRONT_RIGHT].lateral_slip = front_slip;
        self.tires[REAR_LEFT].lateral_slip = rear_slip;
        self.tires[REAR_RIGHT].lateral_slip = rear_slip;

        // tractive force at the driven (rear) axle: the box asks for
        // torque / radius, the patch grants at most what friction supports
        // at the current slip
        let mut tractive_force = 0.0;
        if wheel_torque != 0.0 {
            let demand_per_wheel = wheel_torque / spec.wheels.radius / 2.0;
            for i in [REAR_LEFT, REAR_RIGHT] {
                let contact = &self.tires[i];
                if contact.longitudinal_slip.abs() >= GLOBAL_CONFIG.slip_threshold {
                    // wheelspin or lockup; the patch slides
                    tractive_force += tire::friction_force(
                        &spec.wheels,
                        contact.longitudinal_slip,
                        contact.normal_load,
                    );
                } else {
                    // stiction: the patch transmits what is asked, up to
                    // the static limit
                    let cap = spec.wheels.static_friction * contact.normal_load;
                    tractive_force += demand_per_wheel.clamp(-cap, cap);
                }
            }
        }

        // braking decelerates against travel, capped so one tick can stop
        // the car but never push it backwards
        let mut brake_force = 0.0;
        if driver.brake > 0.0 && v_long != 0.0 {
            let capacity: f64 = self
                .tires
                .iter()
                .map(|t| spec.wheels.static_friction * t.normal_load)
                .sum();
            let stopping = spec.mass * v_long.abs() / dt.max(f64::EPSILON);
            brake_force = -v_long.signum() * (driver.brake * capacity).min(stopping);
        }

        let front_lateral = tire::friction_force(&spec.wheels, front_slip, front_axle_load);
        let rear_lateral = tire::friction_force(&spec.wheels, rear_slip, rear_axle_load);

        let drag = aero::drag_force(spec, environment.air_density, input.velocity);

        // everything the integrator needs, summed in the body frame
        let yaw_torque = front_lateral * steering.cos() * spec.geometry.front_wheels_offset
            - rear_lateral * spec.geometry.rear_wheels_offset;

        Ok(DynamicsOutput {
            longitudinal_force: tractive_force + brake_force + drag.x,
            lateral_force: front_lateral + rear_lateral + drag.z,
            yaw_torque,
            wheel_torque,
            rpm: self.engine.rpm,
            gear: self.drivetrain.current_gear(),
            is_shifting: self.drivetrain.is_shifting(),
        })
    }
}
