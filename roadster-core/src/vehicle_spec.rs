//! The vehicle spec artifact: what a car *is*, as opposed to what it is
//! currently doing. Loaded once, validated once, then shared read-only
//! between every instance of the same model.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SpecError;

// constant to convert Pferdestarke (PS) to kW
const PS_TO_KW: f64 = 0.73549875;

// Friction coefficients past this are outside anything road tires manage;
// the spec is accepted but the number is probably a typo
const PLAUSIBLE_FRICTION_LIMIT: f64 = 2.0;

/// A power or torque curve: values sampled at a uniform RPM spacing.
///
/// The artifact's tables carry a placeholder at index 0 (there is no
/// meaningful output at 0 RPM), so the curve kept here starts one
/// `precision` step above the artifact's `sampling_start` and the
/// placeholder value never takes part in interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCurve {
    pub samples: Vec<f64>,
    /// RPM spacing between consecutive samples
    pub precision: f64,
    /// RPM of `samples[0]`
    pub start: f64,
}

impl EngineCurve {
    fn from_artifact(
        field: &'static str,
        raw: &[f64],
        precision: f64,
        start: f64,
    ) -> Result<EngineCurve, SpecError> {
        if raw.len() < 3 {
            return Err(SpecError::malformed(
                field,
                format!(
                    "needs at least three samples (index 0 is a placeholder), got {}",
                    raw.len()
                ),
            ));
        }
        Ok(EngineCurve {
            samples: raw[1..].to_vec(),
            precision,
            start: start + precision,
        })
    }

    /// RPM of the last sample.
    pub fn end(&self) -> f64 {
        self.start + self.precision * (self.samples.len() - 1) as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub wheelbase: f64,
    pub width: f64,
    pub length: f64,
    /// distance from the center of mass to the front axle, m
    pub front_wheels_offset: f64,
    /// distance from the center of mass to the rear axle, m
    pub rear_wheels_offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WheelSpec {
    pub radius: f64,
    pub static_friction: f64,
    pub sliding_friction: f64,
    /// maximum road wheel angle, radians (the artifact carries degrees)
    pub max_turning_angle: f64,
}

/// Immutable description of one vehicle model, in SI units throughout.
/// All unit conversion happens here at the load boundary: power samples
/// arrive in PS and leave in kW, steering angles arrive in degrees and
/// leave in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub manufacturer: String,
    pub model: String,
    pub full_name: String,

    pub mass: f64,
    pub drag_coefficient: f64,
    pub front_area: f64,

    pub min_rpm: f64,
    pub max_rpm: f64,
    /// kW over RPM
    pub power_curve: EngineCurve,
    /// Nm over RPM
    pub torque_curve: EngineCurve,

    pub geometry: Geometry,
    pub wheels: WheelSpec,

    /// forward ratios, first gear first, strictly decreasing
    pub gear_ratios: Vec<f64>,
    /// final drive ratio, applied after the gearbox ratio
    pub final_drive: f64,
    /// seconds during which the engine is decoupled while changing gears
    pub shift_time: f64,
}

// Mirror of the artifact's on-disk shape. Keys starting with "_comment_"
// are documentation inside the artifact; serde skips unknown keys so they
// never reach validation.
#[derive(Deserialize)]
struct Artifact {
    manufacturer: String,
    model: String,
    full_name: String,
    stats: StatsArtifact,
    geometry: GeometryArtifact,
    wheels: WheelsArtifact,
    transmission: Vec<f64>,
    transmission_base: f64,
    transmission_shift_time: f64,
}

#[derive(Deserialize)]
struct StatsArtifact {
    mass: f64,
    power_samples: Vec<f64>,
    torque_samples: Vec<f64>,
    sampling_precision: f64,
    sampling_start: f64,
    min_rpm: f64,
    max_rpm: f64,
    drag_coefficient: f64,
    front_area: f64,
}

#[derive(Deserialize)]
struct GeometryArtifact {
    wheelbase: f64,
    width: f64,
    length: f64,
    front_wheels_offset: f64,
    rear_wheels_offset: f64,
}

#[derive(Deserialize)]
struct WheelsArtifact {
    radius: f64,
    static_friction: f64,
    sliding_friction: f64,
    max_turning_angle: f64,
}

impl VehicleSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<VehicleSpec, SpecError> {
        let contents = fs::read_to_string(path)?;
        VehicleSpec::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<VehicleSpec, SpecError> {
        let artifact: Artifact = serde_json::from_str(json)?;
        VehicleSpec::from_artifact(artifact)
    }

    fn from_artifact(artifact: Artifact) -> Result<VehicleSpec, SpecError> {
        let stats = &artifact.stats;

        require_positive("stats.mass", stats.mass)?;
        require_non_negative("stats.drag_coefficient", stats.drag_coefficient)?;
        require_positive("stats.front_area", stats.front_area)?;
        require_positive("stats.sampling_precision", stats.sampling_precision)?;

        if stats.power_samples.len() != stats.torque_samples.len() {
            return Err(SpecError::malformed(
                "stats.torque_samples",
                format!(
                    "inconsistent amount of torque and power samples ({} vs {})",
                    stats.torque_samples.len(),
                    stats.power_samples.len()
                ),
            ));
        }

        let power_samples: Vec<f64> = stats.power_samples.iter().map(|ps| ps * PS_TO_KW).collect();
        let power_curve = EngineCurve::from_artifact(
            "stats.power_samples",
            &power_samples,
            stats.sampling_precision,
            stats.sampling_start,
        )?;
        let torque_curve = EngineCurve::from_artifact(
            "stats.torque_samples",
            &stats.torque_samples,
            stats.sampling_precision,
            stats.sampling_start,
        )?;

        require_positive("stats.min_rpm", stats.min_rpm)?;
        if stats.max_rpm <= stats.min_rpm {
            return Err(SpecError::malformed(
                "stats.max_rpm",
                format!("must exceed min_rpm ({} vs {})", stats.max_rpm, stats.min_rpm),
            ));
        }
        // the sampler clamps to the sampled domain, so an operating range
        // poking past either end of the table still reads a value, just a
        // flat one; worth flagging, not worth rejecting
        if stats.min_rpm < torque_curve.start {
            warn!(
                "idle RPM {} sits below the first usable curve sample at {}; torque is flat down there",
                stats.min_rpm, torque_curve.start
            );
        }
        if stats.max_rpm > torque_curve.end() {
            warn!(
                "rev limiter {} sits past the sampled curve end at {}; torque is flat up there",
                stats.max_rpm,
                torque_curve.end()
            );
        }

        let geometry = Geometry {
            wheelbase: artifact.geometry.wheelbase,
            width: artifact.geometry.width,
            length: artifact.geometry.length,
            front_wheels_offset: artifact.geometry.front_wheels_offset,
            rear_wheels_offset: artifact.geometry.rear_wheels_offset,
        };
        require_positive("geometry.wheelbase", geometry.wheelbase)?;
        require_positive("geometry.width", geometry.width)?;
        require_positive("geometry.length", geometry.length)?;
        require_positive("geometry.front_wheels_offset", geometry.front_wheels_offset)?;
        require_positive("geometry.rear_wheels_offset", geometry.rear_wheels_offset)?;

        require_positive("wheels.radius", artifact.wheels.radius)?;
        require_non_negative("wheels.sliding_friction", artifact.wheels.sliding_friction)?;
        if artifact.wheels.static_friction < artifact.wheels.sliding_friction {
            return Err(SpecError::malformed(
                "wheels.static_friction",
                format!(
                    "static friction {} must not be below sliding friction {}",
                    artifact.wheels.static_friction, artifact.wheels.sliding_friction
                ),
            ));
        }
        if artifact.wheels.static_friction > PLAUSIBLE_FRICTION_LIMIT {
            warn!(
                "static friction {} is beyond anything road tires manage",
                artifact.wheels.static_friction
            );
        }
        if artifact.wheels.max_turning_angle <= 0.0 || artifact.wheels.max_turning_angle > 90.0 {
            return Err(SpecError::malformed(
                "wheels.max_turning_angle",
                format!(
                    "must be within (0, 90] degrees, got {}",
                    artifact.wheels.max_turning_angle
                ),
            ));
        }
        let wheels = WheelSpec {
            radius: artifact.wheels.radius,
            static_friction: artifact.wheels.static_friction,
            sliding_friction: artifact.wheels.sliding_friction,
            max_turning_angle: artifact.wheels.max_turning_angle.to_radians(),
        };

        if artifact.transmission.is_empty() {
            return Err(SpecError::malformed(
                "transmission",
                "needs at least one forward gear ratio",
            ));
        }
        for pair in artifact.transmission.windows(2) {
            if pair[1] >= pair[0] {
                return Err(SpecError::malformed(
                    "transmission",
                    format!(
                        "gear ratios must be strictly decreasing, got {} after {}",
                        pair[1], pair[0]
                    ),
                ));
            }
        }
        // strictly decreasing, so checking the smallest ratio covers them all
        if let Some(&ratio) = artifact.transmission.last() {
            require_positive("transmission", ratio)?;
        }
        require_positive("transmission_base", artifact.transmission_base)?;
        require_non_negative("transmission_shift_time", artifact.transmission_shift_time)?;

        let spec = VehicleSpec {
            manufacturer: artifact.manufacturer,
            model: artifact.model,
            full_name: artifact.full_name,
            mass: stats.mass,
            drag_coefficient: stats.drag_coefficient,
            front_area: stats.front_area,
            min_rpm: stats.min_rpm,
            max_rpm: stats.max_rpm,
            power_curve,
            torque_curve,
            geometry,
            wheels,
            gear_ratios: artifact.transmission.clone(),
            final_drive: artifact.transmission_base,
            shift_time: artifact.transmission_shift_time,
        };
        debug!(
            "loaded vehicle spec for {} ({} forward gears)",
            spec.full_name,
            spec.gear_ratios.len()
        );
        Ok(spec)
    }

    /// Number of forward gears.
    pub fn forward_gears(&self) -> u8 {
        self.gear_ratios.len() as u8
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SpecError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SpecError::malformed(
            field,
            format!("must be positive, got {}", value),
        ))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), SpecError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SpecError::malformed(
            field,
            format!("must not be negative, got {}", value),
        ))
    }
}
