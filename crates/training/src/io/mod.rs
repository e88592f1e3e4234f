//! Serialization of trained models.

pub mod format;
pub mod save;

pub use format::{SerializedConfig, SerializedMerge, SerializedModel, SerializedToken};
pub use save::ModelSaver;
