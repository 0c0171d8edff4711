//! Label Rule Thresholds & Weights
//!
//! Constants only. These values define the ground truth the shipped artifacts
//! were trained on; changing any of them requires a retrain.

// ============================================================================
// SLEEP DURATION (hours)
// ============================================================================

/// Below this = severe deprivation
pub const SLEEP_SEVERE_BELOW: f64 = 4.0;
pub const SLEEP_SEVERE_WEIGHT: f64 = 2.0;

/// Below this = moderate deprivation
pub const SLEEP_MODERATE_BELOW: f64 = 6.0;
pub const SLEEP_MODERATE_WEIGHT: f64 = 1.0;

// ============================================================================
// STRESS (1-10)
// ============================================================================

pub const STRESS_HIGH_ABOVE: f64 = 8.0;
pub const STRESS_HIGH_WEIGHT: f64 = 1.0;

pub const STRESS_ELEVATED_ABOVE: f64 = 6.0;
pub const STRESS_ELEVATED_WEIGHT: f64 = 0.5;

// ============================================================================
// HEART RATE (bpm)
// ============================================================================

pub const HEART_RATE_HIGH_ABOVE: f64 = 110.0;
pub const HEART_RATE_HIGH_WEIGHT: f64 = 1.5;

pub const HEART_RATE_ELEVATED_ABOVE: f64 = 90.0;
pub const HEART_RATE_ELEVATED_WEIGHT: f64 = 0.5;

// ============================================================================
// SNORING (apnea indicator)
// ============================================================================

pub const SNORING_PRESENT: f64 = 1.0;
pub const SNORING_WEIGHT: f64 = 2.0;

// ============================================================================
// BMI
// ============================================================================

pub const BMI_SEVERE_ABOVE: f64 = 35.0;
pub const BMI_SEVERE_WEIGHT: f64 = 1.0;

pub const BMI_OBESE_ABOVE: f64 = 30.0;
pub const BMI_OBESE_WEIGHT: f64 = 0.5;

// ============================================================================
// AGE / BLOOD PRESSURE / WORK
// ============================================================================

pub const AGE_ABOVE: f64 = 60.0;
pub const AGE_WEIGHT: f64 = 0.5;

pub const BLOOD_PRESSURE_ABOVE: f64 = 140.0;
pub const BLOOD_PRESSURE_WEIGHT: f64 = 1.0;

pub const WORK_HOURS_ABOVE: f64 = 12.0;
pub const WORK_HOURS_WEIGHT: f64 = 1.0;

// ============================================================================
// BANDS (cumulative score → class)
// ============================================================================

/// score < this → Normal
pub const NORMAL_BELOW: f64 = 1.0;
/// score < this → Sleep Deprivation
pub const DEPRIVATION_BELOW: f64 = 2.5;
/// score < this → Chronic Insomnia, otherwise Sleep Apnea
pub const INSOMNIA_BELOW: f64 = 4.0;
