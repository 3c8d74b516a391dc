// torque (Nm) = power (kW) * POWER_TORQUE_FACTOR / rpm; the factor folds
// the kW -> W and RPM -> rad/s conversions together
pub const POWER_TORQUE_FACTOR: f64 = 9548.8;

// Slip ratios need a ground speed to normalize against; below this floor
// the denominator is held constant so launching from rest stays finite
pub const SLIP_SPEED_FLOOR: f64 = 0.5;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
