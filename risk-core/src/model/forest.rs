//! Random Forest classifier
//!
//! Bagged CART trees with per-split feature sampling. Prediction averages
//! the leaf distributions of all trees and takes the arg-max, so the same
//! scaled input always yields the same class.

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::ModelError;
use super::tree::{DecisionTree, TreeParams};
use crate::features::{layout_hash, FEATURE_VERSION};

// ============================================================================
// PARAMETERS
// ============================================================================

pub const DEFAULT_TREES: usize = 150;
pub const DEFAULT_MAX_DEPTH: usize = 15;
pub const DEFAULT_MIN_SAMPLES_SPLIT: usize = 5;
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 2;
pub const DEFAULT_SEED: u64 = 42;

/// Candidate features per split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(n) => *n,
        };
        n.clamp(1, n_features.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: DEFAULT_TREES,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples_split: DEFAULT_MIN_SAMPLES_SPLIT,
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: DEFAULT_SEED,
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub n_features: usize,
    pub n_classes: usize,
    pub params: ForestParams,
    /// Mean impurity decrease per feature, sums to 1 (all zero if no split)
    pub feature_importances: Vec<f64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit on a scaled (samples × features) matrix with labels in `0..n_classes`
    pub fn fit(
        x: ArrayView2<f64>,
        y: &[usize],
        n_classes: usize,
        params: &ForestParams,
    ) -> Result<Self, ModelError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 || n_features == 0 {
            return Err(ModelError::InvalidTrainingData("empty training matrix".to_string()));
        }
        if y.len() != n_samples {
            return Err(ModelError::InvalidTrainingData(format!(
                "{} labels for {} samples",
                y.len(),
                n_samples
            )));
        }
        if let Some(bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(ModelError::InvalidTrainingData(format!(
                "label {} outside 0..{}",
                bad, n_classes
            )));
        }
        if params.n_estimators == 0 {
            return Err(ModelError::InvalidTrainingData("n_estimators must be > 0".to_string()));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            max_features: params.max_features.resolve(n_features),
        };

        let mut master = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);
        let mut importances = vec![0.0; n_features];

        for _ in 0..params.n_estimators {
            let mut rng = StdRng::seed_from_u64(master.gen());

            let samples: Vec<usize> = if params.bootstrap {
                (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
            } else {
                (0..n_samples).collect()
            };

            let (tree, tree_importances) =
                DecisionTree::fit(x, y, samples, n_classes, &tree_params, &mut rng);

            let total: f64 = tree_importances.iter().sum();
            if total > 0.0 {
                for (acc, value) in importances.iter_mut().zip(tree_importances) {
                    *acc += value / total;
                }
            }
            trees.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        log::debug!(
            "Random forest fitted: {} trees, {} samples, {} features",
            trees.len(),
            n_samples,
            n_features
        );

        Ok(Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            n_features,
            n_classes,
            params: *params,
            feature_importances: importances,
            trees,
        })
    }

    /// Mean class distribution over all trees
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_dimension(self.n_features, x.len())?;

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(x)) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len().max(1) as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    /// Class index with the highest mean probability (ties → lowest index)
    pub fn predict(&self, x: &[f64]) -> Result<usize, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(argmax(&proba))
    }

    /// Fraction of rows predicted correctly
    pub fn accuracy(&self, x: ArrayView2<f64>, y: &[usize]) -> Result<f64, ModelError> {
        ModelError::check_dimension(x.nrows(), y.len())?;
        if y.is_empty() {
            return Ok(0.0);
        }

        let mut correct = 0usize;
        for (row, &expected) in x.rows().into_iter().zip(y) {
            let row = row.to_vec();
            if self.predict(&row)? == expected {
                correct += 1;
            }
        }
        Ok(correct as f64 / y.len() as f64)
    }

    /// Structural validation for loaded artifacts
    pub fn check_integrity(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::InvalidArtifact("forest has no trees".to_string()));
        }
        if let Some(i) = self
            .trees
            .iter()
            .position(|t| !t.is_well_formed(self.n_features, self.n_classes))
        {
            return Err(ModelError::InvalidArtifact(format!("tree {} is malformed", i)));
        }
        Ok(())
    }
}

/// Index of the largest value; ties go to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    /// Two well separated blobs on feature 0, feature 1 is noise
    fn blobs() -> (Array2<f64>, Vec<usize>) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let noise = (i % 7) as f64;
            if i % 2 == 0 {
                data.extend_from_slice(&[-2.0 - (i as f64) * 0.01, noise]);
                labels.push(0);
            } else {
                data.extend_from_slice(&[2.0 + (i as f64) * 0.01, noise]);
                labels.push(1);
            }
        }
        (Array2::from_shape_vec((40, 2), data).unwrap(), labels)
    }

    fn small_params() -> ForestParams {
        ForestParams {
            n_estimators: 15,
            ..ForestParams::default()
        }
    }

    #[test]
    fn test_max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Sqrt.resolve(2), 1);
        assert_eq!(MaxFeatures::All.resolve(9), 9);
        assert_eq!(MaxFeatures::Fixed(20).resolve(9), 9);
        assert_eq!(MaxFeatures::Fixed(0).resolve(9), 1);
    }

    #[test]
    fn test_separable_blobs() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();

        assert_eq!(forest.trees.len(), 15);
        assert_eq!(forest.predict(&[-2.5, 3.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[2.5, 3.0]).unwrap(), 1);
        assert!(forest.accuracy(x.view(), &y).unwrap() >= 0.95);
        assert!(forest.feature_importances[0] > forest.feature_importances[1]);
        assert!((forest.feature_importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();

        let proba = forest.predict_proba(&[0.1, 1.0]).unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = blobs();
        let a = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();
        let b = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();
        let input = [0.3, 4.0];
        assert_eq!(forest.predict(&input).unwrap(), forest.predict(&input).unwrap());
    }

    #[test]
    fn test_dimension_mismatch() {
        let (x, y) = blobs();
        let forest = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();
        assert!(matches!(
            forest.predict(&[1.0, 2.0, 3.0]),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_rejects_bad_training_data() {
        let (x, y) = blobs();
        assert!(RandomForest::fit(x.view(), &y[..10], 2, &small_params()).is_err());
        assert!(RandomForest::fit(x.view(), &y, 1, &small_params()).is_err());

        let no_trees = ForestParams {
            n_estimators: 0,
            ..small_params()
        };
        assert!(RandomForest::fit(x.view(), &y, 2, &no_trees).is_err());
    }

    #[test]
    fn test_argmax_ties_pick_lowest_index() {
        assert_eq!(argmax(&[0.25, 0.25, 0.5, 0.5]), 2);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }

    #[test]
    fn test_integrity_check() {
        let (x, y) = blobs();
        let mut forest = RandomForest::fit(x.view(), &y, 2, &small_params()).unwrap();
        assert!(forest.check_integrity().is_ok());

        forest.n_classes = 3;
        assert!(forest.check_integrity().is_err());

        forest.trees.clear();
        assert!(forest.check_integrity().is_err());
    }
}
