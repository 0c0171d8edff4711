//! End-to-end: train on labelled synthetic rows, persist, reload, classify.

use sleeprisk_core::features::{build_features, BmiInput, IntakeInput, RawInput};
use sleeprisk_core::labeling;
use sleeprisk_core::model::{save_artifacts, ClassificationService, ModelError};
use sleeprisk_core::registry::{lookup, Severity};
use sleeprisk_core::training::{train, TrainingConfig};
use tempfile::tempdir;

fn healthy_input() -> RawInput {
    RawInput {
        sleep_duration: 8.0,
        stress: 2,
        age: 30,
        blood_pressure: "110/70".to_string(),
        heart_rate: 65,
        tea_coffee: IntakeInput::Count(0),
        bmi: BmiInput::Value(22.0),
        snoring: "No".to_string(),
        work_hours: 8.0,
    }
}

fn high_risk_input() -> RawInput {
    RawInput {
        sleep_duration: 3.5,
        stress: 9,
        age: 45,
        blood_pressure: "140/90".to_string(),
        heart_rate: 95,
        tea_coffee: IntakeInput::Count(5),
        bmi: BmiInput::Category("Obese".to_string()),
        snoring: "Yes".to_string(),
        work_hours: 12.0,
    }
}

fn trained_service(dir: &std::path::Path) -> ClassificationService {
    let mut config = TrainingConfig {
        samples: 4000,
        ..TrainingConfig::default()
    };
    config.forest.n_estimators = 40;

    let outcome = train(&config).unwrap();
    save_artifacts(dir, &outcome.scaler, &outcome.forest).unwrap();
    ClassificationService::load(dir)
}

#[test]
fn test_label_rule_on_scenarios() {
    let healthy = build_features(&healthy_input()).unwrap();
    assert_eq!(healthy.blood_pressure_avg(), 90.0);
    assert_eq!(labeling::risk_score(&healthy), 0.0);
    assert_eq!(labeling::label(&healthy).index(), 0);

    let risky = build_features(&high_risk_input()).unwrap();
    assert_eq!(risky.tea_coffee(), 1.0);
    assert_eq!(risky.bmi(), 32.0);
    assert!(labeling::risk_score(&risky) >= 4.0);
    assert_eq!(labeling::label(&risky).index(), 3);
}

#[test]
fn test_trained_classifier_end_to_end() {
    let dir = tempdir().unwrap();
    let service = trained_service(dir.path());
    assert!(service.is_available());

    let healthy = service
        .classify(&build_features(&healthy_input()).unwrap())
        .unwrap();
    assert_eq!(healthy.class_index, 0);
    assert_eq!(healthy.disorder.text, "No sleep disorder detected");
    assert_eq!(healthy.disorder.severity, Severity::Low);

    let risky = service
        .classify(&build_features(&high_risk_input()).unwrap())
        .unwrap();
    assert_eq!(risky.class_index, 3);
    assert_eq!(risky.disorder.severity, Severity::Critical);
    assert!((risky.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    // same input, same answer
    let again = service
        .classify(&build_features(&high_risk_input()).unwrap())
        .unwrap();
    assert_eq!(again.probabilities, risky.probabilities);
}

#[test]
fn test_invalid_input_never_reaches_classifier() {
    let mut input = healthy_input();
    input.blood_pressure = "abc".to_string();
    assert!(build_features(&input).is_err());

    input = healthy_input();
    input.snoring = "Sometimes".to_string();
    assert!(build_features(&input).is_err());
}

#[test]
fn test_missing_artifacts_degrade_gracefully() {
    let dir = tempdir().unwrap();
    let service = ClassificationService::load(&dir.path().join("nothing-here"));

    let features = build_features(&healthy_input()).unwrap();
    assert!(matches!(
        service.classify(&features),
        Err(ModelError::Unavailable { .. })
    ));
    assert!(!service.status().available);
}

#[test]
fn test_unknown_class_lookup() {
    let record = lookup(99);
    assert_eq!(record.name, "Unknown");
    assert_eq!(record.index, None);
}
