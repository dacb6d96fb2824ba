//! Prediction dispatch and severity classification

pub mod dispatcher;
pub mod severity;

pub use dispatcher::{
    predict, PredictionDispatcher, PredictionResult, NO_EXPLANATION, SENTINEL_EXPLANATION,
    SENTINEL_LABEL,
};
pub use severity::Severity;
