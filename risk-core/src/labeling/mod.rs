//! Labeling Module - Label Rule
//!
//! Weighted scoring heuristic that synthesizes training labels.
//!
//! ## Structure
//! - `rules`: thresholds, weights and score bands
//! - `scorer`: scoring logic
//!
//! ## Usage
//! ```
//! use sleeprisk_core::features::FeatureVector;
//! use sleeprisk_core::labeling::{label, risk_score};
//!
//! let row = FeatureVector::from_values([3.9, 2.0, 30.0, 100.0, 65.0, 0.0, 22.0, 0.0, 8.0]);
//! assert_eq!(risk_score(&row), 2.0);
//! assert_eq!(label(&row).index(), 1);
//! ```

pub mod rules;
pub mod scorer;

pub use scorer::{band, explain, label, risk_score, Contribution, LabelOutcome};
