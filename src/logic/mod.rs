//! Prediction logic, independent of HTTP and storage

pub mod input;
pub mod features;
pub mod model;
pub mod recommend;
pub mod analysis;
