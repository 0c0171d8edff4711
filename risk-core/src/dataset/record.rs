use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::registry::{lookup, Disorder};

/// One labelled training row as written to JSONL
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub timestamp: u64,

    // Feature contract
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: Vec<f64>,

    // Label rule output
    pub risk_score: f64,
    pub label: usize,
    pub disorder: String,
}

impl DatasetRecord {
    pub fn new(timestamp: u64, features: &FeatureVector, risk_score: f64, label: Disorder) -> Self {
        Self {
            timestamp,
            feature_version: features.version,
            layout_hash: features.layout_hash,
            features: features.as_slice().to_vec(),
            risk_score,
            label: label.index(),
            disorder: lookup(label.index()).name.to_string(),
        }
    }
}
