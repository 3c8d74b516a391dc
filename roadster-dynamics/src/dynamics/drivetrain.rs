use roadster_core::gear::Gear;
use roadster_core::vehicle_spec::VehicleSpec;
use tracing::debug;

use crate::dynamics::constants::SECONDS_PER_MINUTE;
use crate::error::DynamicsError;

// repeated timer subtraction leaves float residue; anything this small is done
const SHIFT_TIMER_EPSILON: f64 = 1e-9;

/// Gearbox state for one vehicle instance. The current gear only ever
/// changes by a requested shift maturing, so torque is guaranteed to have
/// been cut for the full shift duration first.
#[derive(Copy, Clone, Debug)]
pub struct DrivetrainState {
    current_gear: Gear,
    requested_gear: Gear,
    shift_time_remaining: f64,
}

impl DrivetrainState {
    pub fn in_neutral() -> DrivetrainState {
        DrivetrainState {
            current_gear: Gear::Neutral,
            requested_gear: Gear::Neutral,
            shift_time_remaining: 0.0,
        }
    }

    pub fn current_gear(&self) -> Gear {
        self.current_gear
    }

    /// While this holds, the engine is decoupled and no torque reaches the
    /// wheels. It stays true through the tick in which the timer empties:
    /// the new gear only engages at the start of the following tick, so
    /// the torque cut covers the full shift duration.
    pub fn is_shifting(&self) -> bool {
        self.shift_time_remaining > 0.0 || self.current_gear != self.requested_gear
    }

    /// Validate and arm a gear change. Requests for the gear already
    /// engaged and requests made mid-shift are ignored; a target outside
    /// the transmission's range is a configuration bug.
    pub fn request_shift(&mut self, spec: &VehicleSpec, target: Gear) -> Result<(), DynamicsError> {
        if let Gear::Forward(n) = target {
            if n == 0 || n > spec.forward_gears() {
                return Err(DynamicsError::InvalidGear(target));
            }
        }
        if self.is_shifting() || target == self.current_gear {
            debug!("ignoring shift request to {:?}", target);
            return Ok(());
        }
        self.requested_gear = target;
        if spec.shift_time > 0.0 {
            self.shift_time_remaining = spec.shift_time;
        } else {
            // zero shift duration: the change is immediate
            self.current_gear = target;
        }
        Ok(())
    }

    /// Count down the shift timer; once it has run out, the requested gear
    /// latches at the start of the next tick.
    pub fn tick(&mut self, dt: f64) {
        if self.shift_time_remaining > 0.0 {
            self.shift_time_remaining = (self.shift_time_remaining - dt).max(0.0);
            if self.shift_time_remaining < SHIFT_TIMER_EPSILON {
                self.shift_time_remaining = 0.0;
            }
        } else if self.current_gear != self.requested_gear {
            self.current_gear = self.requested_gear;
        }
    }

    /// Gearbox ratio including sign. The artifact carries no dedicated
    /// reverse ratio, so reverse borrows first gear's and negates it.
    pub fn gear_ratio(&self, spec: &VehicleSpec) -> f64 {
        match self.current_gear {
            Gear::Neutral => 0.0,
            Gear::Reverse => -spec.gear_ratios[0],
            Gear::Forward(n) => spec.gear_ratios[n as usize - 1],
        }
    }

    /// Torque arriving at the driven axle, Nm. Zero while the shift timer
    /// runs and in neutral (ratio 0).
    pub fn wheel_torque(&self, spec: &VehicleSpec, engine_torque: f64) -> f64 {
        if self.is_shifting() {
            return 0.0;
        }
        engine_torque * self.gear_ratio(spec) * spec.final_drive
    }

    /// Crank speed implied by the wheel speed with the clutch engaged.
    pub fn engine_rpm_from_wheel_speed(&self, spec: &VehicleSpec, wheel_omega: f64) -> f64 {
        let total_ratio = (self.gear_ratio(spec) * spec.final_drive).abs();
        wheel_omega.abs() * total_ratio * SECONDS_PER_MINUTE / std::f64::consts::TAU
    }

    /// Clutchless-automatic helper: upshift at the limiter, downshift once
    /// the revs have sagged enough that the gear below would still sit
    /// under its own upshift point. Both paths go through `request_shift`,
    /// so the usual shift timer applies. Only forward gears take part.
    pub fn auto_shift(&mut self, spec: &VehicleSpec, rpm: f64) -> Result<(), DynamicsError> {
        if self.is_shifting() {
            return Ok(());
        }
        let gear = match self.current_gear {
            Gear::Forward(n) => n,
            _ => return Ok(()),
        };
        let ratios = &spec.gear_ratios;
        let index = gear as usize - 1;
        if rpm >= spec.max_rpm && gear < spec.forward_gears() {
            self.request_shift(spec, Gear::Forward(gear + 1))
        } else if gear > 1 && rpm < 0.9 * spec.max_rpm * ratios[index] / ratios[index - 1] {
            self.request_shift(spec, Gear::Forward(gear - 1))
        } else {
            Ok(())
        }
    }
}
