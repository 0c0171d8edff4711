//! Feature Builder - raw form input → canonical FeatureVector
//!
//! One mapping granularity for the whole deployment: every categorical field
//! is binary. The graded snoring answers ("Never"/"Sometimes"/"Every Night")
//! are rejected rather than mapped, since the fitted artifacts never saw 0.5.
//!
//! Nothing here falls back to a default value. A malformed field is a
//! `FeatureError` carrying the field name and the reason.

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;

// ============================================================================
// VALIDATION RANGES (inclusive)
// ============================================================================

pub const SLEEP_RANGE: (f64, f64) = (0.0, 24.0);
pub const STRESS_RANGE: (f64, f64) = (1.0, 10.0);
pub const AGE_RANGE: (f64, f64) = (1.0, 120.0);
pub const HEART_RATE_RANGE: (f64, f64) = (20.0, 250.0);
pub const WORK_HOURS_RANGE: (f64, f64) = (0.0, 24.0);
pub const BMI_RANGE: (f64, f64) = (0.0, 60.0);
pub const BLOOD_PRESSURE_RANGE: (f64, f64) = (30.0, 300.0);

/// BMI category proxies (midpoints the forest was trained around)
pub const BMI_NORMAL: f64 = 22.0;
pub const BMI_OVERWEIGHT: f64 = 28.0;
pub const BMI_OBESE: f64 = 32.0;

// ============================================================================
// ERRORS
// ============================================================================

/// Request-level validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("invalid blood pressure '{value}': expected 'systolic/diastolic' or a single number")]
    InvalidBloodPressure { value: String },

    #[error("invalid value '{value}' for {field}: expected {expected}")]
    InvalidAnswer {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{field} = {value} is out of range ({min}-{max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FeatureError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } => field,
            Self::InvalidBloodPressure { .. } => "blood_pressure",
            Self::InvalidAnswer { field, .. } => field,
            Self::OutOfRange { field, .. } => field,
        }
    }
}

// ============================================================================
// RAW INPUT
// ============================================================================

/// Caffeine intake as submitted: a daily count or a Yes/No answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntakeInput {
    Count(u32),
    Answer(String),
}

/// BMI as submitted: a measured value or a category name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BmiInput {
    Value(f64),
    Category(String),
}

/// Raw per-field inputs of one analysis request. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub sleep_duration: f64,
    pub stress: i64,
    pub age: i64,
    /// "120/80" or "130"
    pub blood_pressure: String,
    pub heart_rate: i64,
    pub tea_coffee: IntakeInput,
    pub bmi: BmiInput,
    /// "Yes" / "No"
    pub snoring: String,
    pub work_hours: f64,
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<f64, FeatureError> {
    if !value.is_finite() || value < min || value > max {
        return Err(FeatureError::OutOfRange { field, value, min, max });
    }
    Ok(value)
}

fn non_blank<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FeatureError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FeatureError::MissingField { field });
    }
    Ok(trimmed)
}

/// Parse a blood pressure reading.
///
/// `"S/D"` yields the arithmetic mean of both parts, anything else is parsed
/// as a single number. Every component must lie in `BLOOD_PRESSURE_RANGE`.
pub fn parse_blood_pressure(value: &str) -> Result<f64, FeatureError> {
    let trimmed = non_blank("blood_pressure", value)?;
    let invalid = || FeatureError::InvalidBloodPressure {
        value: value.to_string(),
    };

    let parse_part = |part: &str| -> Result<f64, FeatureError> {
        let number: f64 = part.trim().parse().map_err(|_| invalid())?;
        check_range("blood_pressure", number, BLOOD_PRESSURE_RANGE)
    };

    match trimmed.split_once('/') {
        Some((systolic, diastolic)) => {
            if diastolic.contains('/') {
                return Err(invalid());
            }
            Ok((parse_part(systolic)? + parse_part(diastolic)?) / 2.0)
        }
        None => parse_part(trimmed),
    }
}

/// Map a Yes/No answer (case-insensitive) to 1/0
pub fn parse_yes_no(field: &'static str, value: &str) -> Result<f64, FeatureError> {
    let trimmed = non_blank(field, value)?;
    if trimmed.eq_ignore_ascii_case("yes") {
        Ok(1.0)
    } else if trimmed.eq_ignore_ascii_case("no") {
        Ok(0.0)
    } else {
        Err(FeatureError::InvalidAnswer {
            field,
            value: value.to_string(),
            expected: "Yes or No",
        })
    }
}

/// Encode caffeine intake as the binary indicator of the canonical contract
pub fn encode_intake(value: &IntakeInput) -> Result<f64, FeatureError> {
    match value {
        IntakeInput::Count(count) => Ok(if *count > 0 { 1.0 } else { 0.0 }),
        IntakeInput::Answer(answer) => parse_yes_no("tea_coffee", answer),
    }
}

/// Resolve a BMI value, mapping categories to their numeric proxies.
/// Numeric strings ("27.4") are accepted as values.
pub fn encode_bmi(value: &BmiInput) -> Result<f64, FeatureError> {
    match value {
        BmiInput::Value(bmi) => check_bmi(*bmi),
        BmiInput::Category(raw) => {
            let trimmed = non_blank("bmi", raw)?;
            if let Ok(bmi) = trimmed.parse::<f64>() {
                return check_bmi(bmi);
            }
            match trimmed.to_ascii_lowercase().as_str() {
                "normal" => Ok(BMI_NORMAL),
                "overweight" => Ok(BMI_OVERWEIGHT),
                "obese" => Ok(BMI_OBESE),
                _ => Err(FeatureError::InvalidAnswer {
                    field: "bmi",
                    value: raw.clone(),
                    expected: "a number or Normal/Overweight/Obese",
                }),
            }
        }
    }
}

fn check_bmi(bmi: f64) -> Result<f64, FeatureError> {
    let (min, max) = BMI_RANGE;
    // lower bound is exclusive
    if !bmi.is_finite() || bmi <= min || bmi > max {
        return Err(FeatureError::OutOfRange { field: "bmi", value: bmi, min, max });
    }
    Ok(bmi)
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builds canonical feature vectors from raw input
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Validate every field and emit the vector in `FEATURE_LAYOUT` order
    pub fn build(&self, input: &RawInput) -> Result<FeatureVector, FeatureError> {
        let values: [f64; FEATURE_COUNT] = [
            check_range("sleep_duration", input.sleep_duration, SLEEP_RANGE)?,
            check_range("stress", input.stress as f64, STRESS_RANGE)?,
            check_range("age", input.age as f64, AGE_RANGE)?,
            parse_blood_pressure(&input.blood_pressure)?,
            check_range("heart_rate", input.heart_rate as f64, HEART_RATE_RANGE)?,
            encode_intake(&input.tea_coffee)?,
            encode_bmi(&input.bmi)?,
            parse_yes_no("snoring", &input.snoring)?,
            check_range("work_hours", input.work_hours, WORK_HOURS_RANGE)?,
        ];

        Ok(FeatureVector::from_values(values))
    }
}

/// Shorthand for `FeatureBuilder::new().build(input)`
pub fn build_features(input: &RawInput) -> Result<FeatureVector, FeatureError> {
    FeatureBuilder::new().build(input)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_blood_pressure_pair_is_averaged() {
        assert_eq!(parse_blood_pressure("120/80"), Ok(100.0));
        assert_eq!(parse_blood_pressure(" 135 / 85 "), Ok(110.0));
    }

    #[test]
    fn test_blood_pressure_single_value() {
        assert_eq!(parse_blood_pressure("130"), Ok(130.0));
    }

    #[test]
    fn test_blood_pressure_garbage_is_rejected_not_zeroed() {
        assert!(matches!(
            parse_blood_pressure("abc"),
            Err(FeatureError::InvalidBloodPressure { .. })
        ));
        assert!(matches!(
            parse_blood_pressure("120/"),
            Err(FeatureError::InvalidBloodPressure { .. })
        ));
        assert!(matches!(
            parse_blood_pressure("120/80/60"),
            Err(FeatureError::InvalidBloodPressure { .. })
        ));
        assert_eq!(
            parse_blood_pressure("   "),
            Err(FeatureError::MissingField { field: "blood_pressure" })
        );
    }

    #[test]
    fn test_blood_pressure_out_of_range() {
        assert!(matches!(
            parse_blood_pressure("900/80"),
            Err(FeatureError::OutOfRange { field: "blood_pressure", .. })
        ));
    }

    #[test]
    fn test_yes_no_mapping() {
        assert_eq!(parse_yes_no("snoring", "Yes"), Ok(1.0));
        assert_eq!(parse_yes_no("snoring", "No"), Ok(0.0));
        assert_eq!(parse_yes_no("snoring", "yes"), Ok(1.0));
        assert_eq!(parse_yes_no("snoring", "NO"), Ok(0.0));
    }

    #[test]
    fn test_yes_no_rejects_other_strings() {
        for value in ["Sometimes", "Every Night", "y", "1"] {
            let err = parse_yes_no("snoring", value).unwrap_err();
            assert_eq!(err.field(), "snoring");
            assert!(matches!(err, FeatureError::InvalidAnswer { .. }));
        }
    }

    #[test]
    fn test_intake_encoding() {
        assert_eq!(encode_intake(&IntakeInput::Count(0)), Ok(0.0));
        assert_eq!(encode_intake(&IntakeInput::Count(5)), Ok(1.0));
        assert_eq!(encode_intake(&IntakeInput::Answer("Yes".into())), Ok(1.0));
        assert!(encode_intake(&IntakeInput::Answer("lots".into())).is_err());
    }

    #[test]
    fn test_bmi_encoding() {
        assert_eq!(encode_bmi(&BmiInput::Value(27.3)), Ok(27.3));
        assert_eq!(encode_bmi(&BmiInput::Category("Normal".into())), Ok(BMI_NORMAL));
        assert_eq!(encode_bmi(&BmiInput::Category("overweight".into())), Ok(BMI_OVERWEIGHT));
        assert_eq!(encode_bmi(&BmiInput::Category("Obese".into())), Ok(BMI_OBESE));
        assert_eq!(encode_bmi(&BmiInput::Category("31.5".into())), Ok(31.5));
        assert!(encode_bmi(&BmiInput::Category("Underweight".into())).is_err());
        assert!(encode_bmi(&BmiInput::Value(0.0)).is_err());
        assert!(encode_bmi(&BmiInput::Value(75.0)).is_err());
    }

    #[test]
    fn test_build_canonical_order() {
        let vector = build_features(&healthy_input()).unwrap();
        assert_eq!(vector.values.len(), FEATURE_COUNT);
        assert_eq!(
            vector.values,
            [8.0, 2.0, 30.0, 90.0, 65.0, 0.0, 22.0, 0.0, 8.0]
        );
    }

    #[test]
    fn test_build_rejects_out_of_range_fields() {
        let mut input = healthy_input();
        input.stress = 11;
        assert!(matches!(
            build_features(&input),
            Err(FeatureError::OutOfRange { field: "stress", .. })
        ));

        let mut input = healthy_input();
        input.sleep_duration = 25.0;
        assert_eq!(build_features(&input).unwrap_err().field(), "sleep_duration");

        let mut input = healthy_input();
        input.work_hours = f64::NAN;
        assert_eq!(build_features(&input).unwrap_err().field(), "work_hours");
    }

    #[test]
    fn test_build_rejects_graded_snoring() {
        let mut input = healthy_input();
        input.snoring = "Sometimes".to_string();
        assert_eq!(build_features(&input).unwrap_err().field(), "snoring");
    }

    #[test]
    fn test_raw_input_deserializes_mixed_types() {
        let input: RawInput = serde_json::from_value(serde_json::json!({
            "sleep_duration": 3.5,
            "stress": 9,
            "age": 45,
            "blood_pressure": "140/90",
            "heart_rate": 95,
            "tea_coffee": 5,
            "bmi": "Obese",
            "snoring": "Yes",
            "work_hours": 12
        }))
        .unwrap();

        assert_eq!(input.tea_coffee, IntakeInput::Count(5));
        assert_eq!(input.bmi, BmiInput::Category("Obese".to_string()));

        let vector = build_features(&input).unwrap();
        assert_eq!(vector.values, [3.5, 9.0, 45.0, 115.0, 95.0, 1.0, 32.0, 1.0, 12.0]);
    }

    #[test]
    fn test_raw_input_missing_field_fails_to_parse() {
        let result: Result<RawInput, _> = serde_json::from_value(serde_json::json!({
            "sleep_duration": 7.0,
            "stress": 3
        }));
        assert!(result.is_err());
    }
}
