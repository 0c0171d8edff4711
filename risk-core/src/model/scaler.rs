//! Standard Scaler - per-feature affine standardization
//!
//! `scaled = (raw - mean) / scale`, with parameters fitted once on the
//! training split and never touched again.

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::error::ModelError;
use crate::features::{layout_hash, FEATURE_VERSION};

/// Fitted standardization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_version: u8,
    pub layout_hash: u32,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Build from known parameters
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ModelError> {
        ModelError::check_dimension(mean.len(), scale.len())?;
        if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ModelError::InvalidArtifact(
                "scaler scale values must be finite and non-zero".to_string(),
            ));
        }

        Ok(Self {
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            mean,
            scale,
        })
    }

    /// Fit on a (samples × features) matrix. Population std (ddof = 0);
    /// constant columns get scale 1.0.
    pub fn fit(x: ArrayView2<f64>) -> Result<Self, ModelError> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ModelError::InvalidTrainingData("no samples to fit scaler".to_string()))?;
        let std = x.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .map(|s| if *s == 0.0 { 1.0 } else { *s })
            .collect();

        log::debug!("Scaler fitted on {} samples x {} features", x.nrows(), x.ncols());

        Self::new(mean.to_vec(), scale)
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one raw vector
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, ModelError> {
        ModelError::check_dimension(self.n_features(), raw.len())?;

        Ok(raw
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }

    /// Standardize every row of a matrix
    pub fn transform_matrix(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ModelError> {
        ModelError::check_dimension(self.n_features(), x.ncols())?;

        let mut scaled = x.to_owned();
        for mut row in scaled.rows_mut() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (*value - self.mean[j]) / self.scale[j];
            }
        }
        Ok(scaled)
    }
}
