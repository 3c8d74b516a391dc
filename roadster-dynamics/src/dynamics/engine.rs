use roadster_core::vehicle_spec::VehicleSpec;
use roadster_core::GLOBAL_CONFIG;

use crate::dynamics::constants::POWER_TORQUE_FACTOR;
use crate::dynamics::curve;
use crate::error::DynamicsError;

/// Torque implied by a power figure at a given crank speed, Nm. The power
/// and torque tables are sampled independently and only approximately
/// agree, so this is for cross-checking artifact data, never propulsion.
/// `rpm` must be positive; the engine's idle clamp guarantees that for
/// anything read off an [`EngineState`].
pub fn torque_implied_by_power(power_kw: f64, rpm: f64) -> f64 {
    power_kw * POWER_TORQUE_FACTOR / rpm
}

/// Mutable engine state for one vehicle instance. The RPM clamp makes the
/// engine stall-proof below idle and keeps the limiter authoritative above
/// max_rpm, so the stored value is always a usable curve input.
#[derive(Copy, Clone, Debug)]
pub struct EngineState {
    /// crank speed, within [min_rpm, max_rpm]
    pub rpm: f64,
    /// last commanded throttle fraction, [0, 1]
    pub throttle: f64,
}

impl EngineState {
    pub fn at_idle(spec: &VehicleSpec) -> EngineState {
        EngineState {
            rpm: spec.min_rpm,
            throttle: 0.0,
        }
    }

    /// Crank torque at the current RPM and throttle, Nm.
    pub fn torque_output(&self, spec: &VehicleSpec) -> Result<f64, DynamicsError> {
        let rpm = self.rpm.clamp(spec.min_rpm, spec.max_rpm);
        let raw = curve::sample_curve(&spec.torque_curve, rpm)?;
        Ok(raw * self.throttle.clamp(0.0, 1.0))
    }

    /// Power at the current RPM, kW. This feeds gauges and diagnostics;
    /// propulsion always goes through the torque curve.
    pub fn power_output(&self, spec: &VehicleSpec) -> Result<f64, DynamicsError> {
        let rpm = self.rpm.clamp(spec.min_rpm, spec.max_rpm);
        curve::sample_curve(&spec.power_curve, rpm)
    }

    /// Drive the crank from the wheels while the clutch is engaged.
    pub fn couple_to_wheels(&mut self, spec: &VehicleSpec, implied_rpm: f64) {
        self.rpm = implied_rpm.clamp(spec.min_rpm, spec.max_rpm);
    }

    /// Decoupled from the wheels (neutral, or mid-shift) the crank chases
    /// the throttle-implied target first-order, so a longer shift lets it
    /// drift further.
    pub fn free_rev(&mut self, spec: &VehicleSpec, dt: f64) {
        let target = spec.min_rpm + self.throttle * (spec.max_rpm - spec.min_rpm);
        let response = GLOBAL_CONFIG.engine_rev_response.max(f64::EPSILON);
        let blend = (dt / response).clamp(0.0, 1.0);
        self.rpm += (target - self.rpm) * blend;
    }
}
