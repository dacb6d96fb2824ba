//! healthdiag - predictive diagnosis pipeline
//!
//! Loads patient records into a local SQLite store, registers the store
//! with a MindsDB server, makes sure a trained diagnosis model exists and
//! classifies patients against it.
//!
//! # Architecture
//!
//! - **store**: tabular loader and relation verifier
//! - **provision**: idempotent data source / project / model setup
//! - **predict**: prediction dispatch and severity tiers
//! - **pipeline**: startup sequence tying the three together

pub mod errors;
pub mod config;
pub mod cli;

pub mod store;
pub mod platform;
pub mod provision;
pub mod predict;
pub mod pipeline;

pub mod doctor;

// Re-export commonly used types
pub use errors::{PipelineError, PlatformError, PredictionError, Result};
pub use pipeline::{PipelineContext, PipelineSettings};
pub use predict::{PredictionResult, Severity};
