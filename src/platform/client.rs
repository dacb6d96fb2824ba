//! MindsDB HTTP client
//!
//! Implements `Platform` over the MindsDB REST API. A 404 from a lookup
//! endpoint becomes `Ok(None)`; connection failures surface as
//! `PlatformError::Unreachable`.

use crate::errors::PlatformError;
use crate::platform::types::{
    DataSource, DataSourceSpec, ModelHandle, ModelRecord, ModelSpec, ModelStatus, PatientInput,
    PredictionRow, Project,
};
use crate::platform::Platform;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// HTTP client for the MindsDB API
#[derive(Debug, Clone)]
pub struct MindsDbClient {
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl MindsDbClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - MindsDB HTTP endpoint (e.g. http://127.0.0.1:47334)
    /// * `request_timeout` - Per-request timeout
    /// * `poll_interval` - Delay between status checks while training
    pub fn new(
        base_url: &str,
        request_timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| PlatformError::Unreachable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_interval,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the MindsDB server is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/status", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Map non-success statuses to errors, 404 to `NotFound`
    async fn check(response: Response, resource: &str) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound(resource.to_string()));
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(PlatformError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_record(&self, project: &str, name: &str) -> Result<Option<ModelRecord>, PlatformError> {
        let url = format!("{}/api/projects/{}/models/{}", self.base_url, project, name);
        let response = self.client.get(&url).send().await?;

        match Self::check(response, &format!("Model '{}'", name)).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl Platform for MindsDbClient {
    async fn list_data_sources(&self) -> Result<Vec<DataSource>, PlatformError> {
        let url = format!("{}/api/databases/", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check(response, "Databases").await?;
        Ok(response.json().await?)
    }

    async fn create_data_source(&self, spec: &DataSourceSpec) -> Result<DataSource, PlatformError> {
        let url = format!("{}/api/databases/", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "database": spec }))
            .send()
            .await?;
        Self::check(response, &format!("Database '{}'", spec.name)).await?;

        Ok(DataSource {
            name: spec.name.clone(),
            engine: Some(spec.engine.clone()),
        })
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>, PlatformError> {
        let url = format!("{}/api/projects/{}", self.base_url, name);
        let response = self.client.get(&url).send().await?;

        match Self::check(response, &format!("Project '{}'", name)).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_project(&self, name: &str) -> Result<Project, PlatformError> {
        let url = format!("{}/api/projects", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "project": { "name": name } }))
            .send()
            .await?;
        Self::check(response, &format!("Project '{}'", name)).await?;

        Ok(Project {
            name: name.to_string(),
        })
    }

    async fn get_model(
        &self,
        project: &Project,
        name: &str,
    ) -> Result<Option<ModelHandle>, PlatformError> {
        let record = self.fetch_record(&project.name, name).await?;
        Ok(record.map(|r| r.into_handle(&project.name)))
    }

    async fn create_model(
        &self,
        project: &Project,
        spec: &ModelSpec,
    ) -> Result<ModelHandle, PlatformError> {
        let url = format!("{}/api/projects/{}/models", self.base_url, project.name);
        let statement = spec.to_create_statement(&project.name);
        debug!(statement = %statement, "Creating model");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": statement }))
            .send()
            .await?;
        let response = Self::check(response, &format!("Project '{}'", project.name)).await?;
        let record: ModelRecord = response.json().await?;

        Ok(record.into_handle(&project.name))
    }

    async fn train_model(&self, model: &ModelHandle) -> Result<ModelHandle, PlatformError> {
        loop {
            let record = self
                .fetch_record(&model.project, &model.name)
                .await?
                .ok_or_else(|| PlatformError::NotFound(format!("Model '{}'", model)))?;

            match record.status {
                ModelStatus::Complete => return Ok(record.into_handle(&model.project)),
                ModelStatus::Error => {
                    return Err(PlatformError::TrainingFailed(record.error.unwrap_or_else(
                        || format!("model '{}' reported status error", model),
                    )));
                }
                ref status => {
                    debug!(model = %model, status = ?status, "Waiting for training");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }

    async fn predict(
        &self,
        model: &ModelHandle,
        input: &PatientInput,
    ) -> Result<PredictionRow, PlatformError> {
        let url = format!(
            "{}/api/projects/{}/models/{}/predict",
            self.base_url, model.project, model.name
        );
        let response = self
            .client
            .post(&url)
            .json(&json!({ "data": [input] }))
            .send()
            .await?;
        let response = Self::check(response, &format!("Model '{}'", model)).await?;
        let rows: Vec<PredictionRow> = response.json().await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| PlatformError::Decode("prediction returned no rows".to_string()))
    }
}
