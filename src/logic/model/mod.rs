//! Model Module - dropout risk classifier
//!
//! The model is loaded once at startup and shared read-only.
//! Forest models come from the offline training job; the rule model
//! stands in when no model file is deployed.

pub mod inference;
pub mod forest;
pub mod fallback;
pub mod loader;

// Re-export common types
pub use inference::{ModelError, ModelInfo};
pub use loader::{load_model, SharedModel};
