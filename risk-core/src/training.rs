//! Training - offline flow producing the scaler and forest artifacts
//!
//! generate → seeded shuffle split → fit scaler on the train split →
//! fit forest on scaled rows → evaluate on both splits.

use std::env;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::dataset::{self, LabeledDataset};
use crate::features::FEATURE_LAYOUT;
use crate::model::{ForestParams, ModelError, RandomForest, StandardScaler};
use crate::registry::CLASS_COUNT;

pub const DEFAULT_SAMPLES: usize = 1000;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    pub samples: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub forest: ForestParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let forest = ForestParams::default();
        Self {
            samples: DEFAULT_SAMPLES,
            seed: forest.seed,
            test_fraction: DEFAULT_TEST_FRACTION,
            forest,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, ModelError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            ModelError::InvalidTrainingData(format!("{} has invalid value '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

impl TrainingConfig {
    /// Defaults overridden by `TRAIN_SAMPLES`, `TRAIN_SEED`,
    /// `TRAIN_TEST_FRACTION` and `TRAIN_TREES`
    pub fn from_env() -> Result<Self, ModelError> {
        let defaults = Self::default();
        let seed = env_or("TRAIN_SEED", defaults.seed)?;

        let config = Self {
            samples: env_or("TRAIN_SAMPLES", defaults.samples)?,
            seed,
            test_fraction: env_or("TRAIN_TEST_FRACTION", defaults.test_fraction)?,
            forest: ForestParams {
                n_estimators: env_or("TRAIN_TREES", defaults.forest.n_estimators)?,
                seed,
                ..defaults.forest
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(ModelError::InvalidTrainingData(format!(
                "test fraction {} outside [0, 1)",
                self.test_fraction
            )));
        }
        if self.train_size() == 0 {
            return Err(ModelError::InvalidTrainingData(
                "no samples left for training".to_string(),
            ));
        }
        Ok(())
    }

    /// Rows held out for testing (rounded up, like the usual split helpers)
    pub fn test_size(&self) -> usize {
        let exact = self.samples as f64 * self.test_fraction;
        let nearest = exact.round();
        // 300 * 0.2 is not exactly 60.0 in floating point
        if (exact - nearest).abs() < 1e-9 {
            nearest as usize
        } else {
            exact.ceil() as usize
        }
    }

    pub fn train_size(&self) -> usize {
        self.samples.saturating_sub(self.test_size())
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Row count per class over the whole generated dataset
    pub class_distribution: [usize; CLASS_COUNT],
    pub train_size: usize,
    pub test_size: usize,
    pub train_accuracy: f64,
    /// `None` when the test split is empty
    pub test_accuracy: Option<f64>,
    /// Sorted by importance, highest first
    pub feature_importance: Vec<FeatureImportance>,
}

impl TrainingReport {
    pub fn log(&self) {
        log::info!(
            "Dataset class distribution (normal/deprivation/insomnia/apnea): {:?}",
            self.class_distribution
        );
        log::info!("Training set: {} samples, test set: {} samples", self.train_size, self.test_size);
        log::info!("Training accuracy: {:.3}", self.train_accuracy);
        if let Some(acc) = self.test_accuracy {
            log::info!("Testing accuracy: {:.3}", acc);
        }
        for entry in &self.feature_importance {
            log::info!("  {:<20} {:.4}", entry.feature, entry.importance);
        }
    }
}

pub struct TrainingOutcome {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    pub dataset: LabeledDataset,
    pub report: TrainingReport,
}

// ============================================================================
// TRAIN
// ============================================================================

/// Shuffle row indices with `seed` and split off the test rows
pub fn split_indices(n: usize, test_size: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let test = indices.split_off(n.saturating_sub(test_size));
    (indices, test)
}

pub fn train(config: &TrainingConfig) -> Result<TrainingOutcome, ModelError> {
    config.validate()?;

    log::info!(
        "Generating {} synthetic samples (seed {})",
        config.samples,
        config.seed
    );
    let dataset = dataset::generate(config.samples, config.seed);

    let (train_rows, test_rows) = split_indices(dataset.len(), config.test_size(), config.seed);
    let train_set = dataset.select(&train_rows);
    let test_set = dataset.select(&test_rows);

    let scaler = StandardScaler::fit(train_set.features.view())?;
    let train_scaled = scaler.transform_matrix(train_set.features.view())?;

    log::info!("Training random forest ({} trees)...", config.forest.n_estimators);
    let forest = RandomForest::fit(
        train_scaled.view(),
        &train_set.labels,
        CLASS_COUNT,
        &config.forest,
    )?;

    let train_accuracy = forest.accuracy(train_scaled.view(), &train_set.labels)?;
    let test_accuracy = if test_set.is_empty() {
        None
    } else {
        let test_scaled = scaler.transform_matrix(test_set.features.view())?;
        Some(forest.accuracy(test_scaled.view(), &test_set.labels)?)
    };

    let mut feature_importance: Vec<FeatureImportance> = FEATURE_LAYOUT
        .iter()
        .zip(&forest.feature_importances)
        .map(|(feature, importance)| FeatureImportance {
            feature: *feature,
            importance: *importance,
        })
        .collect();
    feature_importance.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    let report = TrainingReport {
        class_distribution: dataset.class_distribution(),
        train_size: train_set.len(),
        test_size: test_set.len(),
        train_accuracy,
        test_accuracy,
        feature_importance,
    };

    Ok(TrainingOutcome {
        scaler,
        forest,
        dataset,
        report,
    })
}
