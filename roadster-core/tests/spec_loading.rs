use pretty_assertions::assert_eq;
use serde_json::Value;

use roadster_core::error::SpecError;
use roadster_core::vehicle_spec::VehicleSpec;

const MCLAREN: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../configs/McLarenF1.json");

fn base_artifact() -> Value {
    serde_json::from_str(&std::fs::read_to_string(MCLAREN).unwrap()).unwrap()
}

fn load_mutated(mutate: impl FnOnce(&mut Value)) -> Result<VehicleSpec, SpecError> {
    let mut artifact = base_artifact();
    mutate(&mut artifact);
    VehicleSpec::from_json(&artifact.to_string())
}

#[test]
fn loads_the_mclaren_artifact() {
    let spec = VehicleSpec::load(MCLAREN).unwrap();

    assert_eq!(spec.manufacturer, "McLaren");
    assert_eq!(spec.full_name, "McLaren F1 1993");
    assert_eq!(spec.mass, 1138.0);
    assert_eq!(spec.gear_ratios.len(), 6);
    assert_eq!(spec.forward_gears(), 6);
    assert_eq!(spec.final_drive, 2.56);
    assert_eq!(spec.shift_time, 0.4);
    assert_eq!(spec.geometry.wheelbase, 2.718);
    assert_eq!(spec.wheels.radius, 0.33);
}

#[test]
fn placeholder_sample_is_dropped_from_both_curves() {
    let spec = VehicleSpec::load(MCLAREN).unwrap();

    // the artifact's 0 RPM entry never takes part in interpolation: both
    // curves start one sampling step up, with the placeholder gone
    assert_eq!(spec.torque_curve.start, 1000.0);
    assert_eq!(spec.torque_curve.samples.len(), 8);
    assert_eq!(spec.torque_curve.samples[0], 290.0);
    assert_eq!(spec.torque_curve.end(), 8000.0);
    assert_eq!(spec.power_curve.start, 1000.0);
    assert_eq!(spec.power_curve.samples.len(), 8);
}

#[test]
fn power_samples_converted_from_ps_to_kilowatts() {
    let spec = VehicleSpec::load(MCLAREN).unwrap();

    // artifact carries 430 PS at 5000 RPM
    assert!((spec.power_curve.samples[4] - 430.0 * 0.73549875).abs() < 1e-9);
}

#[test]
fn steering_angle_converted_to_radians() {
    let spec = VehicleSpec::load(MCLAREN).unwrap();
    assert!((spec.wheels.max_turning_angle - 40.0_f64.to_radians()).abs() < 1e-9);
}

#[test]
fn comment_keys_are_ignored() {
    let spec = load_mutated(|artifact| {
        artifact["_comment_extra"] = "scribbles from the data sheet".into();
        artifact["stats"]["_comment_more"] = "still just scribbles".into();
    })
    .unwrap();
    assert_eq!(spec.model, "F1");
}

#[test]
fn rejects_negative_mass() {
    let err = load_mutated(|artifact| artifact["stats"]["mass"] = (-1.0).into()).unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "stats.mass",
            ..
        }
    ));
}

#[test]
fn rejects_mismatched_sample_counts() {
    let err = load_mutated(|artifact| {
        artifact["stats"]["torque_samples"]
            .as_array_mut()
            .unwrap()
            .pop();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "stats.torque_samples",
            ..
        }
    ));
}

#[test]
fn rejects_tables_too_short_to_interpolate() {
    // two entries is still too few: one of them is the placeholder
    let err = load_mutated(|artifact| {
        artifact["stats"]["power_samples"] = vec![0.0, 100.0].into();
        artifact["stats"]["torque_samples"] = vec![0.0, 100.0].into();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "stats.power_samples",
            ..
        }
    ));
}

#[test]
fn rejects_zero_sampling_precision() {
    let err =
        load_mutated(|artifact| artifact["stats"]["sampling_precision"] = 0.into()).unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "stats.sampling_precision",
            ..
        }
    ));
}

#[test]
fn rejects_rev_limit_below_idle() {
    let err = load_mutated(|artifact| artifact["stats"]["max_rpm"] = 700.into()).unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "stats.max_rpm",
            ..
        }
    ));
}

#[test]
fn rejects_non_monotonic_gear_ratios() {
    let err = load_mutated(|artifact| {
        artifact["transmission"] = vec![3.23, 3.30, 1.71].into();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "transmission",
            ..
        }
    ));
}

#[test]
fn rejects_non_positive_gear_ratios() {
    // strictly decreasing but dipping below zero at the top end
    let err = load_mutated(|artifact| {
        artifact["transmission"] = vec![3.23, 2.19, -0.5].into();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "transmission",
            ..
        }
    ));
}

#[test]
fn rejects_empty_transmission() {
    let err = load_mutated(|artifact| {
        artifact["transmission"] = Vec::<f64>::new().into();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "transmission",
            ..
        }
    ));
}

#[test]
fn rejects_sliding_friction_above_static() {
    let err = load_mutated(|artifact| {
        artifact["wheels"]["static_friction"] = 0.5.into();
    })
    .unwrap_err();
    assert!(matches!(
        err,
        SpecError::Malformed {
            field: "wheels.static_friction",
            ..
        }
    ));
}

#[test]
fn rejects_steering_angle_outside_range() {
    for bad_angle in [0.0, -10.0, 120.0] {
        let err = load_mutated(|artifact| {
            artifact["wheels"]["max_turning_angle"] = bad_angle.into();
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SpecError::Malformed {
                field: "wheels.max_turning_angle",
                ..
            }
        ));
    }
}

#[test]
fn rejects_missing_required_field() {
    let err = load_mutated(|artifact| {
        artifact["stats"].as_object_mut().unwrap().remove("mass");
    })
    .unwrap_err();
    assert!(matches!(err, SpecError::Parse(_)));
}

#[test]
fn rejects_non_numeric_field() {
    let err =
        load_mutated(|artifact| artifact["stats"]["mass"] = "heavy".into()).unwrap_err();
    assert!(matches!(err, SpecError::Parse(_)));
}

#[test]
fn rejects_garbage_input() {
    assert!(matches!(
        VehicleSpec::from_json("this is not json").unwrap_err(),
        SpecError::Parse(_)
    ));
}

#[test]
fn error_display_names_the_offending_field() {
    let err = load_mutated(|artifact| artifact["stats"]["mass"] = (-1.0).into()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("stats.mass"));
    assert!(message.contains("malformed vehicle spec"));
}
