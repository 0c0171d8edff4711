//! Inference - scaler + forest behind one immutable handle
//!
//! `RiskClassifier` is built once from validated artifacts and shared via
//! `Arc`. `ClassificationService` wraps it so a missing or broken model
//! degrades to an explicit "unavailable" state instead of a crash.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::artifact::{load_artifacts, ArtifactBundle, ModelMetadata};
use super::error::ModelError;
use super::forest::{argmax, RandomForest};
use super::scaler::StandardScaler;
use crate::features::{layout_hash, FeatureVector, FEATURE_VERSION};
use crate::registry::{lookup, DisorderRecord};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One classification result
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub class_index: usize,
    pub disorder: &'static DisorderRecord,
    pub probabilities: Vec<f64>,
    pub inference_time_us: u64,
}

/// Engine status for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub available: bool,
    pub model_id: Option<String>,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub inference_count: u64,
    pub avg_latency_ms: f64,
    pub reason: Option<String>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug)]
pub struct RiskClassifier {
    scaler: StandardScaler,
    forest: RandomForest,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl RiskClassifier {
    pub fn from_bundle(bundle: ArtifactBundle) -> Self {
        Self {
            scaler: bundle.scaler,
            forest: bundle.forest,
            metadata: bundle.metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Load and validate artifacts from a model directory
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        load_artifacts(dir).map(Self::from_bundle)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Scale the raw vector and run the forest. A rejected vector is logged
    /// with its named values.
    pub fn classify(&self, features: &FeatureVector) -> Result<Assessment, ModelError> {
        self.run(features).map_err(|e| {
            log::error!("Classification failed: {} (input {})", e, features.to_log_entry());
            e
        })
    }

    fn run(&self, features: &FeatureVector) -> Result<Assessment, ModelError> {
        features.validate()?;
        let start = Instant::now();

        let scaled = self.scaler.transform(features.as_slice())?;
        let probabilities = self.forest.predict_proba(&scaled)?;
        let class_index = argmax(&probabilities);

        let inference_time_us = start.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Assessment {
            class_index,
            disorder: lookup(class_index),
            probabilities,
            inference_time_us,
        })
    }

    pub fn inference_count(&self) -> u64 {
        self.inference_count.load(Ordering::Relaxed)
    }

    pub fn avg_latency_ms(&self) -> f64 {
        let count = self.inference_count();
        if count == 0 {
            return 0.0;
        }
        (self.latency_sum_us.load(Ordering::Relaxed) as f64 / count as f64) / 1000.0
    }
}

// ============================================================================
// SERVICE
// ============================================================================

#[derive(Debug, Clone)]
pub enum ClassificationService {
    Ready(Arc<RiskClassifier>),
    Unavailable { reason: String },
}

impl ClassificationService {
    /// Load from a model directory; failures become `Unavailable`
    pub fn load(dir: &Path) -> Self {
        log::info!("Loading model artifacts from: {}", dir.display());

        match RiskClassifier::load(dir) {
            Ok(classifier) => {
                log::info!(
                    "Model loaded: id={} trees={}",
                    classifier.metadata().model_id,
                    classifier.metadata().n_trees
                );
                ClassificationService::Ready(Arc::new(classifier))
            }
            Err(e) => {
                log::error!("Classification disabled: {}", e);
                ClassificationService::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ClassificationService::Ready(_))
    }

    pub fn classify(&self, features: &FeatureVector) -> Result<Assessment, ModelError> {
        match self {
            ClassificationService::Ready(classifier) => classifier.classify(features),
            ClassificationService::Unavailable { reason } => Err(ModelError::Unavailable {
                reason: reason.clone(),
            }),
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self {
            ClassificationService::Ready(classifier) => EngineStatus {
                available: true,
                model_id: Some(classifier.metadata().model_id.clone()),
                feature_version: FEATURE_VERSION,
                layout_hash: layout_hash(),
                inference_count: classifier.inference_count(),
                avg_latency_ms: classifier.avg_latency_ms(),
                reason: None,
            },
            ClassificationService::Unavailable { reason } => EngineStatus {
                available: false,
                model_id: None,
                feature_version: FEATURE_VERSION,
                layout_hash: layout_hash(),
                inference_count: 0,
                avg_latency_ms: 0.0,
                reason: Some(reason.clone()),
            },
        }
    }
}

impl From<RiskClassifier> for ClassificationService {
    fn from(classifier: RiskClassifier) -> Self {
        ClassificationService::Ready(Arc::new(classifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::save_artifacts;
    use crate::model::forest::ForestParams;
    use crate::registry::CLASS_COUNT;
    use ndarray::Array2;
    use tempfile::tempdir;

    /// Class is decided by sleep duration alone
    fn write_toy_model(dir: &Path) {
        let mut data = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let class = i % CLASS_COUNT;
            let sleep = 9.0 - class as f64 * 2.0;
            data.extend_from_slice(&[sleep, 5.0, 40.0, 110.0, 70.0, 0.0, 24.0, 0.0, 8.0]);
            labels.push(class);
        }
        let x = Array2::from_shape_vec((40, 9), data).unwrap();
        let scaler = StandardScaler::fit(x.view()).unwrap();
        let scaled = scaler.transform_matrix(x.view()).unwrap();
        let params = ForestParams {
            n_estimators: 10,
            ..ForestParams::default()
        };
        let forest = RandomForest::fit(scaled.view(), &labels, CLASS_COUNT, &params).unwrap();
        save_artifacts(dir, &scaler, &forest).unwrap();
    }

    fn row(sleep: f64) -> FeatureVector {
        FeatureVector::from_values([sleep, 5.0, 40.0, 110.0, 70.0, 0.0, 24.0, 0.0, 8.0])
    }

    #[test]
    fn test_ready_service_classifies() {
        let dir = tempdir().unwrap();
        write_toy_model(dir.path());

        let service = ClassificationService::load(dir.path());
        assert!(service.is_available());

        let healthy = service.classify(&row(9.0)).unwrap();
        assert_eq!(healthy.class_index, 0);
        assert_eq!(healthy.disorder.name, "Normal");
        assert_eq!(healthy.probabilities.len(), CLASS_COUNT);

        let severe = service.classify(&row(3.0)).unwrap();
        assert_eq!(severe.class_index, 3);
        assert_eq!(severe.disorder.text, "Critical Risk: Possible Sleep Apnea");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let dir = tempdir().unwrap();
        write_toy_model(dir.path());
        let classifier = RiskClassifier::load(dir.path()).unwrap();

        let a = classifier.classify(&row(6.0)).unwrap();
        let b = classifier.classify(&row(6.0)).unwrap();
        assert_eq!(a.class_index, b.class_index);
        assert_eq!(a.probabilities, b.probabilities);
        assert_eq!(classifier.inference_count(), 2);
    }

    #[test]
    fn test_class_is_most_probable_and_matches_forest() {
        let dir = tempdir().unwrap();
        write_toy_model(dir.path());
        let bundle = load_artifacts(dir.path()).unwrap();
        let scaled = bundle.scaler.transform(row(5.0).as_slice()).unwrap();
        let expected = bundle.forest.predict(&scaled).unwrap();
        let classifier = RiskClassifier::from_bundle(bundle);

        for sleep in [3.0, 5.0, 7.0, 9.0] {
            let assessment = classifier.classify(&row(sleep)).unwrap();
            let top = assessment
                .probabilities
                .iter()
                .cloned()
                .fold(f64::MIN, f64::max);
            assert_eq!(assessment.probabilities[assessment.class_index], top);
            assert!(assessment.probabilities[..assessment.class_index]
                .iter()
                .all(|p| *p < top));
        }
        assert_eq!(classifier.classify(&row(5.0)).unwrap().class_index, expected);
        assert_eq!(classifier.inference_count(), 5);
    }

    #[test]
    fn test_missing_artifacts_make_service_unavailable() {
        let dir = tempdir().unwrap();
        let service = ClassificationService::load(dir.path());

        assert!(!service.is_available());
        assert!(matches!(
            service.classify(&row(8.0)),
            Err(ModelError::Unavailable { .. })
        ));

        let status = service.status();
        assert!(!status.available);
        assert!(status.reason.is_some());
        assert_eq!(status.model_id, None);
    }

    #[test]
    fn test_status_reports_model() {
        let dir = tempdir().unwrap();
        write_toy_model(dir.path());
        let service = ClassificationService::load(dir.path());
        service.classify(&row(7.0)).unwrap();

        let status = service.status();
        assert!(status.available);
        assert_eq!(status.inference_count, 1);
        assert_eq!(status.feature_version, FEATURE_VERSION);
        assert_eq!(status.model_id.map(|id| id.len()), Some(64));
    }

    #[test]
    fn test_rejects_foreign_layout_vector() {
        let dir = tempdir().unwrap();
        write_toy_model(dir.path());
        let classifier = RiskClassifier::load(dir.path()).unwrap();

        let mut features = row(8.0);
        features.layout_hash ^= 1;
        assert!(matches!(
            classifier.classify(&features),
            Err(ModelError::Layout(_))
        ));
    }
}
