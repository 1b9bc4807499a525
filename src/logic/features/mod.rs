//! Features Module - maps student fields to the classifier input

pub mod layout;
pub mod vector;

pub use layout::FEATURE_COUNT;
pub use vector::FeatureVector;
