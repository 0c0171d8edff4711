//! Feature Vector - Core data structure for classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Values are always stored in `FEATURE_LAYOUT` order. The vector is created
//! per request by the builder, classified once, and dropped.

use serde::{Deserialize, Serialize};

use super::layout::{
    feature_index, layout_hash, validate_layout, LayoutMismatchError, AGE, BLOOD_PRESSURE_AVG,
    BMI, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, HEART_RATE, SLEEP_DURATION, SNORING,
    STRESS, TEA_COFFEE, WORK_HOURS,
};

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    pub fn sleep_duration(&self) -> f64 {
        self.values[SLEEP_DURATION]
    }

    pub fn stress(&self) -> f64 {
        self.values[STRESS]
    }

    pub fn age(&self) -> f64 {
        self.values[AGE]
    }

    pub fn blood_pressure_avg(&self) -> f64 {
        self.values[BLOOD_PRESSURE_AVG]
    }

    pub fn heart_rate(&self) -> f64 {
        self.values[HEART_RATE]
    }

    pub fn tea_coffee(&self) -> f64 {
        self.values[TEA_COFFEE]
    }

    pub fn bmi(&self) -> f64 {
        self.values[BMI]
    }

    pub fn snoring(&self) -> f64 {
        self.values[SNORING]
    }

    pub fn work_hours(&self) -> f64 {
        self.values[WORK_HOURS]
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
                .collect::<serde_json::Map<_, _>>(),
        })
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector::from_values([7.5, 4.0, 41.0, 100.0, 72.0, 1.0, 24.5, 0.0, 9.0])
    }

    #[test]
    fn test_from_values_stamps_layout() {
        let vector = sample();
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash());
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_named_accessors_follow_layout() {
        let vector = sample();
        assert_eq!(vector.sleep_duration(), 7.5);
        assert_eq!(vector.stress(), 4.0);
        assert_eq!(vector.age(), 41.0);
        assert_eq!(vector.blood_pressure_avg(), 100.0);
        assert_eq!(vector.heart_rate(), 72.0);
        assert_eq!(vector.tea_coffee(), 1.0);
        assert_eq!(vector.bmi(), 24.5);
        assert_eq!(vector.snoring(), 0.0);
        assert_eq!(vector.work_hours(), 9.0);
    }

    #[test]
    fn test_get_by_name() {
        let vector = sample();
        assert_eq!(vector.get_by_name("bmi"), Some(24.5));
        assert_eq!(vector.get_by_name("gender"), None);
    }

    #[test]
    fn test_stale_vector_fails_validation() {
        let mut vector = sample();
        vector.version = FEATURE_VERSION + 1;
        assert!(vector.validate().is_err());
    }

    #[test]
    fn test_to_log_entry() {
        let log = sample().to_log_entry();
        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["named_values"]["heart_rate"], 72.0);
        assert_eq!(log["values"].as_array().map(|v| v.len()), Some(FEATURE_COUNT));
    }
}
