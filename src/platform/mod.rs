//! Model-serving platform
//!
//! The `Platform` trait is the seam between this crate and the external
//! service that stores data sources, projects and models:
//! - Listing and registering data sources
//! - Looking up and creating projects
//! - Looking up, creating and training models
//! - Running predictions
//!
//! Lookups return `Ok(None)` for absence; an `Err` always means the
//! platform failed to answer, never that the resource is missing.

pub mod client;
pub mod types;

pub use client::MindsDbClient;
pub use types::{
    DataSource, DataSourceSpec, ModelHandle, ModelSpec, ModelStatus, PatientInput, PredictionRow,
    Project,
};

use crate::errors::PlatformError;
use async_trait::async_trait;

#[async_trait]
pub trait Platform: Send + Sync {
    async fn list_data_sources(&self) -> Result<Vec<DataSource>, PlatformError>;

    async fn create_data_source(&self, spec: &DataSourceSpec) -> Result<DataSource, PlatformError>;

    async fn get_project(&self, name: &str) -> Result<Option<Project>, PlatformError>;

    async fn create_project(&self, name: &str) -> Result<Project, PlatformError>;

    async fn get_model(
        &self,
        project: &Project,
        name: &str,
    ) -> Result<Option<ModelHandle>, PlatformError>;

    async fn create_model(
        &self,
        project: &Project,
        spec: &ModelSpec,
    ) -> Result<ModelHandle, PlatformError>;

    /// Block until the model has finished training
    async fn train_model(&self, model: &ModelHandle) -> Result<ModelHandle, PlatformError>;

    async fn predict(
        &self,
        model: &ModelHandle,
        input: &PatientInput,
    ) -> Result<PredictionRow, PlatformError>;
}
