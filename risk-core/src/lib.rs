//! Sleep Disorder Risk - Core Classification Pipeline
//!
//! ```text
//! form input ──► features::build_features ──► FeatureVector (raw, 9 values)
//!                                                   │
//!                          model::StandardScaler ◄──┘
//!                                   │
//!                          model::RandomForest ──► class index ──► registry::lookup
//! ```
//!
//! Offline, `training::train` draws synthetic rows (`dataset`), labels them
//! with the weighted rule in `labeling`, and fits the scaler and forest that
//! the `train` binary writes to disk.

pub mod dataset;
pub mod features;
pub mod labeling;
pub mod model;
pub mod registry;
pub mod training;

pub use features::{build_features, FeatureError, FeatureVector, RawInput};
pub use model::{Assessment, ClassificationService, EngineStatus, ModelError, RiskClassifier};
pub use registry::{lookup, Disorder, DisorderRecord, Severity};
