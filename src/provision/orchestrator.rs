//! Provisioning orchestrator
//!
//! Brings the platform from "nothing exists" to "data source + project +
//! trained model" with check-then-act steps, safe to re-run on every start:
//!
//! 1. Data source `health_data`: listed by name, registered if missing
//! 2. Project `health_diagnosis`: looked up, created if absent
//! 3. Model `diagnosis_predictor`: looked up, created and trained if absent
//!
//! A model that already exists is taken as trained; its status is not
//! re-checked and it is never retrained.

use crate::errors::{PipelineError, Result};
use crate::platform::{DataSourceSpec, ModelHandle, ModelSpec, Platform, Project};
use crate::store::PATIENTS_RELATION;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub const DATA_SOURCE_NAME: &str = "health_data";
pub const PROJECT_NAME: &str = "health_diagnosis";
pub const MODEL_NAME: &str = "diagnosis_predictor";
pub const TARGET_COLUMN: &str = "diagnosis";
pub const DATA_SOURCE_ENGINE: &str = "sqlite";

/// Query the model trains on
pub fn training_query() -> String {
    format!("SELECT * FROM {}", PATIENTS_RELATION)
}

/// What a provisioning step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Created,
    AlreadyExists,
}

impl StepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Created => "created",
            StepOutcome::AlreadyExists => "already exists",
        }
    }
}

/// Outcome of each step of one provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    pub data_source: StepOutcome,
    pub project: StepOutcome,
    pub model: StepOutcome,
}

impl ProvisionReport {
    pub fn created_anything(&self) -> bool {
        [self.data_source, self.project, self.model].contains(&StepOutcome::Created)
    }
}

/// Trained model plus how it was obtained
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub model: ModelHandle,
    pub report: ProvisionReport,
}

/// Location of the local store as the platform should see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub db_file: PathBuf,
}

impl StoreDescriptor {
    pub fn new(db_file: impl Into<PathBuf>) -> Self {
        Self {
            db_file: db_file.into(),
        }
    }

    fn data_source_spec(&self) -> DataSourceSpec {
        DataSourceSpec::sqlite(DATA_SOURCE_NAME, &self.db_file.display().to_string())
    }
}

/// Runs the provisioning steps against one platform
pub struct Orchestrator<'a> {
    platform: &'a dyn Platform,
    store: StoreDescriptor,
    training_timeout: Option<Duration>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(platform: &'a dyn Platform, store: StoreDescriptor) -> Self {
        Self {
            platform,
            store,
            training_timeout: None,
        }
    }

    /// Bound the blocking training call; `None` waits indefinitely
    pub fn with_training_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.training_timeout = timeout;
        self
    }

    /// Run every step in order, stopping at the first failure
    pub async fn provision(&self) -> Result<Provisioned> {
        let data_source = self.ensure_data_source().await?;
        let (project, project_outcome) = self.ensure_project().await?;
        let (model, model_outcome) = self.ensure_model(&project).await?;

        Ok(Provisioned {
            model,
            report: ProvisionReport {
                data_source,
                project: project_outcome,
                model: model_outcome,
            },
        })
    }

    async fn ensure_data_source(&self) -> Result<StepOutcome> {
        let registration_err = |source| PipelineError::Registration {
            name: DATA_SOURCE_NAME.to_string(),
            source,
        };

        let existing = self
            .platform
            .list_data_sources()
            .await
            .map_err(registration_err)?;

        if existing.iter().any(|ds| ds.name == DATA_SOURCE_NAME) {
            info!("Data source '{}' already exists", DATA_SOURCE_NAME);
            return Ok(StepOutcome::AlreadyExists);
        }

        self.platform
            .create_data_source(&self.store.data_source_spec())
            .await
            .map_err(registration_err)?;

        info!(
            db_file = %self.store.db_file.display(),
            "Registered store as data source '{}'", DATA_SOURCE_NAME
        );
        Ok(StepOutcome::Created)
    }

    async fn ensure_project(&self) -> Result<(Project, StepOutcome)> {
        let found = self
            .platform
            .get_project(PROJECT_NAME)
            .await
            .map_err(|source| PipelineError::Lookup {
                kind: "project",
                name: PROJECT_NAME.to_string(),
                source,
            })?;

        if let Some(project) = found {
            info!("Project '{}' already exists", PROJECT_NAME);
            return Ok((project, StepOutcome::AlreadyExists));
        }

        info!("Creating project '{}'", PROJECT_NAME);
        let project = self
            .platform
            .create_project(PROJECT_NAME)
            .await
            .map_err(|source| PipelineError::Creation {
                kind: "project",
                name: PROJECT_NAME.to_string(),
                source,
            })?;

        info!("Project '{}' created", PROJECT_NAME);
        Ok((project, StepOutcome::Created))
    }

    async fn ensure_model(&self, project: &Project) -> Result<(ModelHandle, StepOutcome)> {
        let found = self
            .platform
            .get_model(project, MODEL_NAME)
            .await
            .map_err(|source| PipelineError::Lookup {
                kind: "model",
                name: MODEL_NAME.to_string(),
                source,
            })?;

        if let Some(model) = found {
            info!(status = ?model.status, "Model '{}' already exists", MODEL_NAME);
            return Ok((model, StepOutcome::AlreadyExists));
        }

        let spec = ModelSpec {
            name: MODEL_NAME.to_string(),
            target: TARGET_COLUMN.to_string(),
            integration: DATA_SOURCE_NAME.to_string(),
            query: training_query(),
        };

        info!(project = %project.name, "Creating model '{}'", MODEL_NAME);
        let created = self
            .platform
            .create_model(project, &spec)
            .await
            .map_err(|source| PipelineError::Creation {
                kind: "model",
                name: MODEL_NAME.to_string(),
                source,
            })?;

        info!("Model creation initiated, waiting for training to complete");
        let trained = self.train(&created).await?;
        info!("Model '{}' training complete", MODEL_NAME);

        Ok((trained, StepOutcome::Created))
    }

    async fn train(&self, model: &ModelHandle) -> Result<ModelHandle> {
        let training = self.platform.train_model(model);

        let outcome = match self.training_timeout {
            Some(limit) => tokio::time::timeout(limit, training).await.map_err(|_| {
                PipelineError::TrainingTimeout {
                    name: model.name.clone(),
                    duration_secs: limit.as_secs(),
                }
            })?,
            None => training.await,
        };

        outcome.map_err(|source| PipelineError::Training {
            name: model.name.clone(),
            source,
        })
    }
}

/// Provision with default settings, returning the trained model
pub async fn provision(platform: &dyn Platform, store: &StoreDescriptor) -> Result<ModelHandle> {
    let provisioned = Orchestrator::new(platform, store.clone()).provision().await?;
    Ok(provisioned.model)
}
