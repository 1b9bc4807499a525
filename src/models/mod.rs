//! Data models

pub mod student;

pub use student::*;
