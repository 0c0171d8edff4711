//! Features Module - FeatureVector Builder
//!
//! Turns heterogeneous form input into the fixed 9-feature vector the scaler
//! and forest were fitted on.

pub mod builder;
pub mod layout;
pub mod vector;

// Re-export common types
pub use builder::{
    build_features, parse_blood_pressure, parse_yes_no, BmiInput, FeatureBuilder, FeatureError,
    IntakeInput, RawInput,
};
pub use layout::{
    feature_index, feature_name, layout_hash, validate_layout, LayoutInfo, LayoutMismatchError,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use vector::FeatureVector;
