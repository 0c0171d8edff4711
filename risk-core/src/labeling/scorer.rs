//! Label Rule Scorer
//!
//! Deterministic and explainable. Input is a RAW (unscaled) feature row.
//! Used only to synthesize training labels, never on the serving path.

use serde::Serialize;

use super::rules::*;
use crate::features::FeatureVector;
use crate::registry::Disorder;

/// One factor that added to the risk score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub factor: &'static str,
    pub weight: f64,
}

/// Score, class and the factors behind them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelOutcome {
    pub score: f64,
    pub disorder: Disorder,
    pub contributions: Vec<Contribution>,
}

/// Score a feature row and keep the list of contributing factors
pub fn explain(features: &FeatureVector) -> LabelOutcome {
    let mut contributions = Vec::new();
    let mut add = |factor: &'static str, weight: f64| {
        contributions.push(Contribution { factor, weight });
    };

    let sleep = features.sleep_duration();
    if sleep < SLEEP_SEVERE_BELOW {
        add("severe sleep deprivation", SLEEP_SEVERE_WEIGHT);
    } else if sleep < SLEEP_MODERATE_BELOW {
        add("moderate sleep deprivation", SLEEP_MODERATE_WEIGHT);
    }

    let stress = features.stress();
    if stress > STRESS_HIGH_ABOVE {
        add("high stress", STRESS_HIGH_WEIGHT);
    } else if stress > STRESS_ELEVATED_ABOVE {
        add("elevated stress", STRESS_ELEVATED_WEIGHT);
    }

    let heart_rate = features.heart_rate();
    if heart_rate > HEART_RATE_HIGH_ABOVE {
        add("high heart rate", HEART_RATE_HIGH_WEIGHT);
    } else if heart_rate > HEART_RATE_ELEVATED_ABOVE {
        add("elevated heart rate", HEART_RATE_ELEVATED_WEIGHT);
    }

    if features.snoring() == SNORING_PRESENT {
        add("snoring", SNORING_WEIGHT);
    }

    let bmi = features.bmi();
    if bmi > BMI_SEVERE_ABOVE {
        add("severe obesity", BMI_SEVERE_WEIGHT);
    } else if bmi > BMI_OBESE_ABOVE {
        add("obesity", BMI_OBESE_WEIGHT);
    }

    if features.age() > AGE_ABOVE {
        add("age over 60", AGE_WEIGHT);
    }

    if features.blood_pressure_avg() > BLOOD_PRESSURE_ABOVE {
        add("high blood pressure", BLOOD_PRESSURE_WEIGHT);
    }

    if features.work_hours() > WORK_HOURS_ABOVE {
        add("long working hours", WORK_HOURS_WEIGHT);
    }

    // Summed in rule order so the float result is reproducible
    let score = contributions.iter().fold(0.0, |acc, c| acc + c.weight);

    LabelOutcome {
        score,
        disorder: band(score),
        contributions,
    }
}

/// Cumulative risk score of a raw feature row
pub fn risk_score(features: &FeatureVector) -> f64 {
    explain(features).score
}

/// Band a cumulative score into a class
pub fn band(score: f64) -> Disorder {
    if score < NORMAL_BELOW {
        Disorder::Normal
    } else if score < DEPRIVATION_BELOW {
        Disorder::SleepDeprivation
    } else if score < INSOMNIA_BELOW {
        Disorder::ChronicInsomnia
    } else {
        Disorder::SleepApnea
    }
}

/// Training label of a raw feature row
pub fn label(features: &FeatureVector) -> Disorder {
    band(risk_score(features))
}
