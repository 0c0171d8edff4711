//! Model Module - Scaler, Random Forest and inference
//!
//! ## Structure
//! - `scaler`: per-feature standardization
//! - `tree` / `forest`: CART trees and the bagged ensemble
//! - `artifact`: JSON persistence with layout checks
//! - `inference`: shared classifier and the service wrapper

pub mod artifact;
pub mod error;
pub mod forest;
pub mod inference;
pub mod scaler;
pub mod tree;

pub use artifact::{
    artifact_checksum, load_artifacts, save_artifacts, ArtifactBundle, ModelMetadata, MODEL_FILE,
    SCALER_FILE,
};
pub use error::ModelError;
pub use forest::{ForestParams, MaxFeatures, RandomForest};
pub use inference::{Assessment, ClassificationService, EngineStatus, RiskClassifier};
pub use scaler::StandardScaler;
pub use tree::{DecisionTree, Node, TreeParams};
