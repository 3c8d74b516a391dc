use serde::{Deserialize, Serialize};

// DriverInputs gets handed to the simulation every tick to describe what the
// driver is doing with the pedals and the wheel
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct DriverInputs {
    /// accelerator pedal position, 0 to 1
    pub throttle: f64,
    /// brake pedal position, 0 to 1
    pub brake: f64,
    /// requested road wheel angle in radians, positive steers left; clamped
    /// against the vehicle's maximum steering angle before use
    pub steering_angle: f64,
}

impl DriverInputs {
    pub fn neutral() -> DriverInputs {
        DriverInputs {
            throttle: 0.0,
            brake: 0.0,
            steering_angle: 0.0,
        }
    }

    /// Everything downstream assumes pedal positions in [0, 1].
    pub fn clamped(&self) -> DriverInputs {
        DriverInputs {
            throttle: self.throttle.clamp(0.0, 1.0),
            brake: self.brake.clamp(0.0, 1.0),
            steering_angle: self.steering_angle,
        }
    }
}
