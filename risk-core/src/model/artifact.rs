//! Model Artifacts - persistence for the fitted scaler and forest
//!
//! Two JSON files side by side in one directory:
//! - `scaler.json`: fitted `StandardScaler`
//! - `model.json`: fitted `RandomForest`
//!
//! Both carry the feature version and layout hash they were trained against.
//! Loading rejects anything built for a different layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ModelError;
use super::forest::RandomForest;
use super::scaler::StandardScaler;
use crate::features::{validate_layout, FEATURE_COUNT};
use crate::registry::CLASS_COUNT;

pub const SCALER_FILE: &str = "scaler.json";
pub const MODEL_FILE: &str = "model.json";

/// Metadata about a loaded artifact pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub model_path: String,
    pub n_trees: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// A validated scaler + forest pair
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub scaler: StandardScaler,
    pub forest: RandomForest,
    pub metadata: ModelMetadata,
}

pub fn scaler_path(dir: &Path) -> PathBuf {
    dir.join(SCALER_FILE)
}

pub fn model_path(dir: &Path) -> PathBuf {
    dir.join(MODEL_FILE)
}

fn checksum_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 hex of an artifact file; the model file's checksum is the model id
pub fn artifact_checksum(path: &Path) -> Result<String, ModelError> {
    let bytes = fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(checksum_bytes(&bytes))
}

// ============================================================================
// SAVE
// ============================================================================

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, ModelError> {
    let bytes = serde_json::to_vec(value).map_err(|source| ModelError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, &bytes).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes)
}

/// Persist both artifacts, returning the model id
pub fn save_artifacts(
    dir: &Path,
    scaler: &StandardScaler,
    forest: &RandomForest,
) -> Result<String, ModelError> {
    fs::create_dir_all(dir).map_err(|source| ModelError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_json(&scaler_path(dir), scaler)?;
    let model_bytes = write_json(&model_path(dir), forest)?;
    let model_id = checksum_bytes(&model_bytes);

    log::info!(
        "Saved model artifacts to {} (model {}, {} trees)",
        dir.display(),
        model_id,
        forest.trees.len()
    );
    Ok(model_id)
}

// ============================================================================
// LOAD
// ============================================================================

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<(T, Vec<u8>), ModelError> {
    let bytes = fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|source| ModelError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((value, bytes))
}

/// Load and validate the scaler + forest pair from `dir`
pub fn load_artifacts(dir: &Path) -> Result<ArtifactBundle, ModelError> {
    let (scaler, _): (StandardScaler, _) = read_json(&scaler_path(dir))?;
    let (forest, model_bytes): (RandomForest, _) = read_json(&model_path(dir))?;

    validate_layout(scaler.feature_version, scaler.layout_hash)?;
    validate_layout(forest.feature_version, forest.layout_hash)?;

    ModelError::check_dimension(FEATURE_COUNT, scaler.n_features())?;
    ModelError::check_dimension(FEATURE_COUNT, forest.n_features)?;
    if scaler.scale.len() != scaler.mean.len() || scaler.scale.iter().any(|s| *s == 0.0) {
        return Err(ModelError::InvalidArtifact("scaler has zero or missing scale".to_string()));
    }
    if forest.n_classes != CLASS_COUNT {
        return Err(ModelError::InvalidArtifact(format!(
            "forest predicts {} classes, registry has {}",
            forest.n_classes, CLASS_COUNT
        )));
    }
    forest.check_integrity()?;

    let metadata = ModelMetadata {
        model_id: checksum_bytes(&model_bytes),
        model_path: model_path(dir).display().to_string(),
        n_trees: forest.trees.len(),
        n_features: forest.n_features,
        n_classes: forest.n_classes,
        loaded_at: chrono::Utc::now(),
    };

    Ok(ArtifactBundle {
        scaler,
        forest,
        metadata,
    })
}
