//! Synthetic Sampler - draws raw feature rows from fixed ranges
//!
//! Rows are labelled by the label rule. Same `(n, seed)` → same dataset.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::labeling;
use crate::registry::CLASS_COUNT;

// Half-open ranges, matching the generator the shipped artifacts came from
pub const SLEEP_HOURS: std::ops::Range<f64> = 3.0..10.0;
pub const STRESS_LEVEL: std::ops::RangeInclusive<i64> = 1..=10;
pub const AGE_YEARS: std::ops::RangeInclusive<i64> = 20..=79;
pub const BLOOD_PRESSURE: std::ops::Range<f64> = 80.0..160.0;
pub const HEART_RATE_BPM: std::ops::RangeInclusive<i64> = 50..=149;
pub const BMI_VALUE: std::ops::Range<f64> = 18.0..40.0;
pub const WORK_HOURS_PER_DAY: std::ops::RangeInclusive<i64> = 0..=15;

/// Feature matrix with one label per row
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    pub features: Array2<f64>,
    pub labels: Vec<usize>,
}

impl LabeledDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row count per class index
    pub fn class_distribution(&self) -> [usize; CLASS_COUNT] {
        class_distribution(&self.labels)
    }

    /// Copy the given rows into a new dataset
    pub fn select(&self, rows: &[usize]) -> LabeledDataset {
        LabeledDataset {
            features: self.features.select(ndarray::Axis(0), rows),
            labels: rows.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    pub fn row(&self, index: usize) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for (dst, src) in values.iter_mut().zip(self.features.row(index)) {
            *dst = *src;
        }
        FeatureVector::from_values(values)
    }
}

pub fn class_distribution(labels: &[usize]) -> [usize; CLASS_COUNT] {
    let mut counts = [0; CLASS_COUNT];
    for &label in labels {
        if label < CLASS_COUNT {
            counts[label] += 1;
        }
    }
    counts
}

pub struct SyntheticSampler {
    rng: StdRng,
}

impl SyntheticSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one raw row in layout order
    pub fn sample(&mut self) -> FeatureVector {
        let rng = &mut self.rng;
        FeatureVector::from_values([
            rng.gen_range(SLEEP_HOURS),
            rng.gen_range(STRESS_LEVEL) as f64,
            rng.gen_range(AGE_YEARS) as f64,
            rng.gen_range(BLOOD_PRESSURE),
            rng.gen_range(HEART_RATE_BPM) as f64,
            rng.gen_range(0..=1) as f64,
            rng.gen_range(BMI_VALUE),
            rng.gen_range(0..=1) as f64,
            rng.gen_range(WORK_HOURS_PER_DAY) as f64,
        ])
    }

    /// Draw `n` rows and label each with the label rule
    pub fn generate(&mut self, n: usize) -> LabeledDataset {
        let rows: Vec<FeatureVector> = (0..n).map(|_| self.sample()).collect();
        let labels = rows.iter().map(|row| labeling::label(row).index()).collect();

        LabeledDataset {
            features: Array2::from_shape_fn((n, FEATURE_COUNT), |(i, j)| rows[i].as_slice()[j]),
            labels,
        }
    }
}

/// Convenience wrapper: `n` labelled rows from `seed`
pub fn generate(n: usize, seed: u64) -> LabeledDataset {
    SyntheticSampler::new(seed).generate(n)
}
