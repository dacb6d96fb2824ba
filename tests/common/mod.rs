//! In-memory platform shared by the integration tests
//!
//! Keeps data sources, projects and models in memory, counts every call and
//! can be told to fail at any step.

#![allow(dead_code)]

use async_trait::async_trait;
use healthdiag::platform::{
    DataSource, DataSourceSpec, ModelHandle, ModelSpec, ModelStatus, PatientInput, Platform,
    PredictionRow, Project,
};
use healthdiag::PlatformError;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// Step at which the platform should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    ListDataSources,
    CreateDataSource,
    GetProject,
    CreateProject,
    GetModel,
    CreateModel,
    Train,
    Predict,
}

/// Number of times each operation was invoked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calls {
    pub list_data_sources: usize,
    pub create_data_source: usize,
    pub get_project: usize,
    pub create_project: usize,
    pub get_model: usize,
    pub create_model: usize,
    pub train_model: usize,
    pub predict: usize,
}

impl Calls {
    pub fn creations(&self) -> usize {
        self.create_data_source + self.create_project + self.create_model
    }

    pub fn total(&self) -> usize {
        self.list_data_sources
            + self.create_data_source
            + self.get_project
            + self.create_project
            + self.get_model
            + self.create_model
            + self.train_model
            + self.predict
    }
}

#[derive(Default)]
struct State {
    data_sources: Vec<DataSourceSpec>,
    projects: Vec<String>,
    models: Vec<(ModelHandle, ModelSpec)>,
    inputs: Vec<PatientInput>,
    calls: Calls,
    faults: HashSet<Fault>,
    train_delay: Option<Duration>,
    prediction: Option<PredictionRow>,
}

#[derive(Default)]
pub struct RecordingPlatform {
    state: Mutex<State>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform that already has everything a previous run would have created
    pub fn provisioned(model_status: ModelStatus) -> Self {
        let platform = Self::new();
        {
            let mut state = platform.state.lock().unwrap();
            state
                .data_sources
                .push(DataSourceSpec::sqlite("health_data", "health_data.db"));
            state.projects.push("health_diagnosis".to_string());
            state.models.push((
                ModelHandle {
                    project: "health_diagnosis".to_string(),
                    name: "diagnosis_predictor".to_string(),
                    status: model_status,
                },
                ModelSpec {
                    name: "diagnosis_predictor".to_string(),
                    target: "diagnosis".to_string(),
                    integration: "health_data".to_string(),
                    query: "SELECT * FROM patients".to_string(),
                },
            ));
        }
        platform
    }

    pub fn fail_at(&self, fault: Fault) {
        self.state.lock().unwrap().faults.insert(fault);
    }

    pub fn set_train_delay(&self, delay: Duration) {
        self.state.lock().unwrap().train_delay = Some(delay);
    }

    /// Row returned by every prediction
    pub fn set_prediction(&self, row: serde_json::Value) {
        let row = row.as_object().cloned().expect("prediction row must be an object");
        self.state.lock().unwrap().prediction = Some(row);
    }

    pub fn calls(&self) -> Calls {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn data_sources(&self) -> Vec<DataSourceSpec> {
        self.state.lock().unwrap().data_sources.clone()
    }

    pub fn model_specs(&self) -> Vec<ModelSpec> {
        self.state
            .lock()
            .unwrap()
            .models
            .iter()
            .map(|(_, spec)| spec.clone())
            .collect()
    }

    pub fn inputs(&self) -> Vec<PatientInput> {
        self.state.lock().unwrap().inputs.clone()
    }

    fn check(state: &State, fault: Fault) -> Result<(), PlatformError> {
        if state.faults.contains(&fault) {
            let message = format!("injected failure at {:?}", fault);
            return Err(match fault {
                Fault::ListDataSources | Fault::GetProject | Fault::GetModel => {
                    PlatformError::Unreachable(message)
                }
                Fault::Train => PlatformError::TrainingFailed(message),
                _ => PlatformError::Api {
                    status: 400,
                    message,
                },
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn list_data_sources(&self) -> Result<Vec<DataSource>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.list_data_sources += 1;
        Self::check(&state, Fault::ListDataSources)?;
        Ok(state
            .data_sources
            .iter()
            .map(|spec| DataSource {
                name: spec.name.clone(),
                engine: Some(spec.engine.clone()),
            })
            .collect())
    }

    async fn create_data_source(&self, spec: &DataSourceSpec) -> Result<DataSource, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_data_source += 1;
        Self::check(&state, Fault::CreateDataSource)?;
        if state.data_sources.iter().any(|ds| ds.name == spec.name) {
            return Err(PlatformError::Api {
                status: 409,
                message: format!("Database '{}' already exists", spec.name),
            });
        }
        state.data_sources.push(spec.clone());
        Ok(DataSource {
            name: spec.name.clone(),
            engine: Some(spec.engine.clone()),
        })
    }

    async fn get_project(&self, name: &str) -> Result<Option<Project>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_project += 1;
        Self::check(&state, Fault::GetProject)?;
        Ok(state.projects.iter().find(|p| *p == name).map(|p| Project {
            name: p.clone(),
        }))
    }

    async fn create_project(&self, name: &str) -> Result<Project, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_project += 1;
        Self::check(&state, Fault::CreateProject)?;
        state.projects.push(name.to_string());
        Ok(Project {
            name: name.to_string(),
        })
    }

    async fn get_model(
        &self,
        project: &Project,
        name: &str,
    ) -> Result<Option<ModelHandle>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_model += 1;
        Self::check(&state, Fault::GetModel)?;
        Ok(state
            .models
            .iter()
            .find(|(m, _)| m.project == project.name && m.name == name)
            .map(|(m, _)| m.clone()))
    }

    async fn create_model(
        &self,
        project: &Project,
        spec: &ModelSpec,
    ) -> Result<ModelHandle, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_model += 1;
        Self::check(&state, Fault::CreateModel)?;
        let handle = ModelHandle {
            project: project.name.clone(),
            name: spec.name.clone(),
            status: ModelStatus::Generating,
        };
        state.models.push((handle.clone(), spec.clone()));
        Ok(handle)
    }

    async fn train_model(&self, model: &ModelHandle) -> Result<ModelHandle, PlatformError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.train_model += 1;
            state.train_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        let failed = state.faults.contains(&Fault::Train);
        let entry = state
            .models
            .iter_mut()
            .find(|(m, _)| m.project == model.project && m.name == model.name)
            .ok_or_else(|| PlatformError::NotFound(format!("Model '{}'", model)))?;

        if failed {
            entry.0.status = ModelStatus::Error;
            return Err(PlatformError::TrainingFailed(format!(
                "injected failure at {:?}",
                Fault::Train
            )));
        }
        entry.0.status = ModelStatus::Complete;
        Ok(entry.0.clone())
    }

    async fn predict(
        &self,
        _model: &ModelHandle,
        input: &PatientInput,
    ) -> Result<PredictionRow, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.predict += 1;
        state.inputs.push(input.clone());
        Self::check(&state, Fault::Predict)?;
        Ok(state.prediction.clone().unwrap_or_else(|| {
            json!({"diagnosis": "stable"})
                .as_object()
                .cloned()
                .unwrap_or_default()
        }))
    }
}

/// The three-row patient file used across scenarios
pub const PATIENTS_CSV: &str = "age,gender,symptom1,symptom2,symptom3,diagnosis\n\
    45,M,fever,cough,fatigue,needs_attention\n\
    71,F,chest pain,dizziness,shortness of breath,critical\n\
    23,F,headache,runny nose,sneezing,stable\n";
