//! Doctor command for pipeline diagnostics
//!
//! Read-only health checks: nothing is created, registered or trained.

use crate::errors::PipelineError;
use crate::platform::{ModelStatus, Platform, Project};
use crate::provision::{DATA_SOURCE_NAME, MODEL_NAME, PROJECT_NAME};
use crate::store::{self, RelationHandle, PATIENTS_RELATION};
use std::path::PathBuf;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor<'a> {
    platform: &'a dyn Platform,
    csv_path: PathBuf,
    db_path: PathBuf,
}

impl<'a> Doctor<'a> {
    /// Create a new doctor instance
    pub fn new(platform: &'a dyn Platform, csv_path: PathBuf, db_path: PathBuf) -> Self {
        Self {
            platform,
            csv_path,
            db_path,
        }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![
            self.check_source_file(),
            self.check_relation(),
            self.check_data_source().await,
        ];

        let (project_check, project) = self.check_project().await;
        checks.push(project_check);
        checks.push(self.check_model(project.as_ref()).await);

        checks
    }

    fn check_source_file(&self) -> HealthCheck {
        let name = "Source file";
        if self.csv_path.is_file() {
            HealthCheck::new(name, HealthStatus::Pass)
        } else {
            HealthCheck::new(
                name,
                HealthStatus::Fail(format!("{} not found", self.csv_path.display())),
            )
        }
    }

    fn check_relation(&self) -> HealthCheck {
        let name = "Patients relation";
        if !self.db_path.is_file() {
            return HealthCheck::new(
                name,
                HealthStatus::Warn(format!("{} not created yet", self.db_path.display())),
            );
        }

        let handle = match RelationHandle::open(&self.db_path, PATIENTS_RELATION) {
            Ok(handle) => handle,
            Err(e) => return HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        };

        match store::verify(&handle) {
            Ok(_) => HealthCheck::new(name, HealthStatus::Pass),
            Err(PipelineError::EmptyRelation(_)) => {
                HealthCheck::new(name, HealthStatus::Warn("Relation is empty".to_string()))
            }
            Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        }
    }

    async fn check_data_source(&self) -> HealthCheck {
        let name = "Data source";
        match self.platform.list_data_sources().await {
            Ok(sources) if sources.iter().any(|s| s.name == DATA_SOURCE_NAME) => {
                HealthCheck::new(name, HealthStatus::Pass)
            }
            Ok(_) => HealthCheck::new(
                name,
                HealthStatus::Warn(format!("'{}' not registered", DATA_SOURCE_NAME)),
            ),
            Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        }
    }

    async fn check_project(&self) -> (HealthCheck, Option<Project>) {
        let name = "Project";
        match self.platform.get_project(PROJECT_NAME).await {
            Ok(Some(project)) => (HealthCheck::new(name, HealthStatus::Pass), Some(project)),
            Ok(None) => (
                HealthCheck::new(
                    name,
                    HealthStatus::Warn(format!("'{}' does not exist", PROJECT_NAME)),
                ),
                None,
            ),
            Err(e) => (HealthCheck::new(name, HealthStatus::Fail(e.to_string())), None),
        }
    }

    async fn check_model(&self, project: Option<&Project>) -> HealthCheck {
        let name = "Model";
        let Some(project) = project else {
            return HealthCheck::new(
                name,
                HealthStatus::Warn(format!("'{}' has no project yet", MODEL_NAME)),
            );
        };

        match self.platform.get_model(project, MODEL_NAME).await {
            Ok(Some(model)) => match model.status {
                ModelStatus::Complete => HealthCheck::new(name, HealthStatus::Pass),
                ModelStatus::Error => HealthCheck::new(
                    name,
                    HealthStatus::Fail(format!("'{}' failed to train", MODEL_NAME)),
                ),
                status => HealthCheck::new(
                    name,
                    HealthStatus::Warn(format!("'{}' status is {:?}", MODEL_NAME, status)),
                ),
            },
            Ok(None) => HealthCheck::new(
                name,
                HealthStatus::Warn(format!("'{}' does not exist", MODEL_NAME)),
            ),
            Err(e) => HealthCheck::new(name, HealthStatus::Fail(e.to_string())),
        }
    }
}

/// True when no check failed
pub fn all_passed(checks: &[HealthCheck]) -> bool {
    !checks
        .iter()
        .any(|c| matches!(c.status, HealthStatus::Fail(_)))
}
