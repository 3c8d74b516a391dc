use roadster_core::vehicle_spec::{VehicleSpec, WheelSpec};
use roadster_core::GLOBAL_CONFIG;

use crate::dynamics::constants::SLIP_SPEED_FLOOR;

/// Per-wheel mutable contact state. Slips here are contact patch velocity
/// relative to the ground, normalized by travel speed: negative
/// longitudinal slip means the wheel surface outruns the ground (power),
/// positive means it lags (lockup).
#[derive(Copy, Clone, Debug, Default)]
pub struct TireState {
    pub longitudinal_slip: f64,
    pub lateral_slip: f64,
    /// N
    pub normal_load: f64,
}

/// Friction force for one slip channel, N, signed to oppose the slip.
///
/// Below the slip threshold the patch is in stiction and force ramps
/// linearly up to `static_friction * load`; past it the patch slides and
/// Coulomb friction takes over, flat in slip magnitude.
pub fn friction_force(wheels: &WheelSpec, slip: f64, normal_load: f64) -> f64 {
    let threshold = GLOBAL_CONFIG.slip_threshold;
    let magnitude = if slip.abs() < threshold {
        wheels.static_friction * normal_load * slip.abs() / threshold
    } else {
        wheels.sliding_friction * normal_load
    };
    -magnitude * slip.signum()
}

/// Clamp the requested steering angle to the vehicle's mechanical limit,
/// then to the grip limit: past the speed where the tires can no longer
/// supply the centripetal force for the geometric turning radius, the
/// usable angle shrinks to asin(wheelbase / (v^2 / mu g)).
pub fn effective_steering_angle(
    spec: &VehicleSpec,
    speed: f64,
    requested: f64,
    gravity: f64,
) -> f64 {
    let limit = spec.wheels.max_turning_angle;
    let mechanical = requested.clamp(-limit, limit);

    // tightest radius the tires can hold at this speed
    let grip_radius = speed * speed / (spec.wheels.static_friction * gravity);
    if grip_radius.is_finite() && grip_radius > spec.geometry.wheelbase {
        let grip_limit = (spec.geometry.wheelbase / grip_radius).asin();
        mechanical.clamp(-grip_limit, grip_limit)
    } else {
        // slow enough (or grip-starved enough) that the mechanical stop is
        // the only constraint
        mechanical
    }
}

/// Front and rear axle lateral slips from the bicycle model: yaw rotation
/// adds lateral patch velocity at the front axle and subtracts it at the
/// rear, and the front wheels subtract the angle they are steered by.
pub fn axle_lateral_slips(
    spec: &VehicleSpec,
    v_long: f64,
    v_lat: f64,
    yaw_rate: f64,
    steering_angle: f64,
) -> (f64, f64) {
    let denom = v_long.abs().max(SLIP_SPEED_FLOOR);
    let front =
        ((v_lat + yaw_rate * spec.geometry.front_wheels_offset) / denom).atan() - steering_angle;
    let rear = ((v_lat - yaw_rate * spec.geometry.rear_wheels_offset) / denom).atan();
    (front, rear)
}
