use roadster_core::vehicle_spec::EngineCurve;

use crate::error::DynamicsError;

/// Linearly interpolate a uniformly spaced curve table at `rpm`.
///
/// `start` is the RPM of `samples[0]` and `precision` the spacing between
/// consecutive samples. The input is clamped to the sampled domain first,
/// so anything past the last sample reads the last value flat.
pub fn sample(samples: &[f64], precision: f64, start: f64, rpm: f64) -> Result<f64, DynamicsError> {
    if samples.len() < 2 {
        return Err(DynamicsError::InvalidCurve("fewer than two samples"));
    }
    if precision <= 0.0 {
        return Err(DynamicsError::InvalidCurve("non-positive sampling precision"));
    }

    let end = start + precision * (samples.len() - 1) as f64;
    let index = (rpm.clamp(start, end) - start) / precision;
    let lo = index.floor() as usize;
    let frac = index - lo as f64;

    if lo + 1 >= samples.len() {
        // exactly at (or numerically past) the last sample
        return Ok(samples[samples.len() - 1]);
    }
    Ok(samples[lo] * (1.0 - frac) + samples[lo + 1] * frac)
}

pub fn sample_curve(curve: &EngineCurve, rpm: f64) -> Result<f64, DynamicsError> {
    sample(&curve.samples, curve.precision, curve.start, rpm)
}
