//! Type definitions for the model-serving platform
//!
//! Wire shapes for the MindsDB REST endpoints plus the handles the
//! orchestrator and dispatcher pass around.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A data source the platform already knows about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSource {
    pub name: String,

    #[serde(default)]
    pub engine: Option<String>,
}

/// Parameters for registering a data source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceSpec {
    pub name: String,
    pub engine: String,
    pub parameters: Map<String, Value>,
}

impl DataSourceSpec {
    /// SQLite store registered by file path
    pub fn sqlite(name: &str, db_file: &str) -> Self {
        let mut parameters = Map::new();
        parameters.insert("db_file".to_string(), Value::String(db_file.to_string()));
        Self {
            name: name.to_string(),
            engine: "sqlite".to_string(),
            parameters,
        }
    }
}

/// A namespace holding models
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub name: String,
}

/// Definition of a model to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    /// Column the model learns to predict
    pub target: String,
    /// Registered data source the training query runs against
    pub integration: String,
    pub query: String,
}

impl ModelSpec {
    /// `CREATE MODEL` statement for this spec inside `project`
    pub fn to_create_statement(&self, project: &str) -> String {
        format!(
            "CREATE MODEL {}.{} FROM {} ({}) PREDICT {}",
            project, self.name, self.integration, self.query, self.target
        )
    }
}

/// Lifecycle reported by the platform for a model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Generating,
    Training,
    Complete,
    Error,
    #[serde(other)]
    Unknown,
}

impl ModelStatus {
    /// Training has stopped, successfully or not
    pub fn is_finished(&self) -> bool {
        matches!(self, ModelStatus::Complete | ModelStatus::Error)
    }
}

impl Default for ModelStatus {
    fn default() -> Self {
        ModelStatus::Unknown
    }
}

/// Reference to a model on the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub project: String,
    pub name: String,
    pub status: ModelStatus,
}

impl fmt::Display for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.project, self.name)
    }
}

/// Model description as returned by `/api/projects/{p}/models/{m}`
#[derive(Debug, Deserialize)]
pub struct ModelRecord {
    pub name: String,

    #[serde(default)]
    pub status: ModelStatus,

    #[serde(default)]
    pub error: Option<String>,
}

impl ModelRecord {
    pub fn into_handle(self, project: &str) -> ModelHandle {
        ModelHandle {
            project: project.to_string(),
            name: self.name,
            status: self.status,
        }
    }
}

/// The five attributes a prediction is made from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientInput {
    pub age: i64,
    pub gender: String,
    pub symptom1: String,
    pub symptom2: String,
    pub symptom3: String,
}

impl PatientInput {
    pub fn new(
        age: i64,
        gender: impl Into<String>,
        symptom1: impl Into<String>,
        symptom2: impl Into<String>,
        symptom3: impl Into<String>,
    ) -> Self {
        Self {
            age,
            gender: gender.into(),
            symptom1: symptom1.into(),
            symptom2: symptom2.into(),
            symptom3: symptom3.into(),
        }
    }
}

/// One output row of a prediction call, keyed by column name
pub type PredictionRow = Map<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_statement() {
        let spec = ModelSpec {
            name: "diagnosis_predictor".to_string(),
            target: "diagnosis".to_string(),
            integration: "health_data".to_string(),
            query: "SELECT * FROM patients".to_string(),
        };
        assert_eq!(
            spec.to_create_statement("health_diagnosis"),
            "CREATE MODEL health_diagnosis.diagnosis_predictor FROM health_data (SELECT * FROM patients) PREDICT diagnosis"
        );
    }

    #[test]
    fn test_model_status_parsing() {
        let record: ModelRecord =
            serde_json::from_value(json!({"name": "m", "status": "complete"})).unwrap();
        assert_eq!(record.status, ModelStatus::Complete);

        let record: ModelRecord =
            serde_json::from_value(json!({"name": "m", "status": "queued"})).unwrap();
        assert_eq!(record.status, ModelStatus::Unknown);
        assert!(!record.status.is_finished());

        let record: ModelRecord = serde_json::from_value(json!({"name": "m"})).unwrap();
        assert_eq!(record.status, ModelStatus::Unknown);
    }

    #[test]
    fn test_sqlite_spec_serialization() {
        let spec = DataSourceSpec::sqlite("health_data", "health_data.db");
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "health_data",
                "engine": "sqlite",
                "parameters": {"db_file": "health_data.db"}
            })
        );
    }

    #[test]
    fn test_patient_input_serialization() {
        let input = PatientInput::new(45, "M", "fever", "cough", "fatigue");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["age"], 45);
        assert_eq!(value["symptom3"], "fatigue");
    }

    #[test]
    fn test_handle_display() {
        let handle = ModelHandle {
            project: "health_diagnosis".to_string(),
            name: "diagnosis_predictor".to_string(),
            status: ModelStatus::Complete,
        };
        assert_eq!(handle.to_string(), "health_diagnosis.diagnosis_predictor");
    }
}
