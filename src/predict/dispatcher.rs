//! Prediction dispatcher
//!
//! Sends the five patient attributes to the trained model and turns the
//! returned row into a `PredictionResult`. `try_predict` keeps failures
//! typed; `predict` downgrades them to the sentinel result so callers
//! always get a well-formed answer.

use crate::errors::PredictionError;
use crate::platform::{ModelHandle, PatientInput, Platform, PredictionRow};
use crate::predict::severity::Severity;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

/// Column holding the predicted label
pub const LABEL_COLUMN: &str = "diagnosis";

/// Column holding the platform's explanation of the label
pub const EXPLANATION_COLUMN: &str = "diagnosis_explain";

/// Explanation used when the platform returns none
pub const NO_EXPLANATION: &str = "No explanation provided";

/// Label returned when the prediction call fails
pub const SENTINEL_LABEL: &str = "Unable to predict";

/// Explanation returned when the prediction call fails
pub const SENTINEL_EXPLANATION: &str = "An error occurred during prediction";

/// Diagnosis, explanation and severity for one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    pub diagnosis: String,
    pub explanation: String,
    pub severity: Severity,
}

impl PredictionResult {
    pub fn new(diagnosis: String, explanation: String) -> Self {
        let severity = Severity::from_label(&diagnosis);
        Self {
            diagnosis,
            explanation,
            severity,
        }
    }

    /// Fallback result for a failed prediction
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_LABEL.to_string(), SENTINEL_EXPLANATION.to_string())
    }

    /// Build a result from a prediction row
    pub fn from_row(row: &PredictionRow) -> Result<Self, PredictionError> {
        let diagnosis = match row.get(LABEL_COLUMN) {
            None | Some(Value::Null) => {
                return Err(PredictionError::MissingLabel(LABEL_COLUMN.to_string()))
            }
            Some(Value::String(label)) => label.clone(),
            Some(other) => other.to_string(),
        };

        let explanation = match row.get(EXPLANATION_COLUMN) {
            None | Some(Value::Null) => NO_EXPLANATION.to_string(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };

        Ok(Self::new(diagnosis, explanation))
    }
}

/// Runs predictions against one published model
pub struct PredictionDispatcher<'a> {
    platform: &'a dyn Platform,
    model: &'a ModelHandle,
}

impl<'a> PredictionDispatcher<'a> {
    pub fn new(platform: &'a dyn Platform, model: &'a ModelHandle) -> Self {
        Self { platform, model }
    }

    pub fn model(&self) -> &ModelHandle {
        self.model
    }

    /// Predict, keeping failures distinguishable from genuine results
    pub async fn try_predict(&self, input: &PatientInput) -> Result<PredictionResult, PredictionError> {
        let row = self.platform.predict(self.model, input).await?;
        debug!(model = %self.model, ?row, "Prediction row");
        PredictionResult::from_row(&row)
    }

    /// Predict, returning the sentinel result on any failure
    pub async fn predict(&self, input: &PatientInput) -> PredictionResult {
        match self.try_predict(input).await {
            Ok(result) => result,
            Err(e) => {
                error!(model = %self.model, error = %e, "Error during prediction");
                PredictionResult::sentinel()
            }
        }
    }
}

/// Classify one patient against `model`
pub async fn predict(
    platform: &dyn Platform,
    model: &ModelHandle,
    age: i64,
    gender: &str,
    symptom1: &str,
    symptom2: &str,
    symptom3: &str,
) -> PredictionResult {
    let input = PatientInput::new(age, gender, symptom1, symptom2, symptom3);
    PredictionDispatcher::new(platform, model).predict(&input).await
}
