//! Startup sequence and shared prediction context
//!
//! Load → verify → close store → provision → publish. Any failure halts
//! startup before a model handle is published. The resulting
//! `PipelineContext` is what request handlers predict through.

use crate::config::Config;
use crate::errors::{PipelineError, PredictionError, Result};
use crate::platform::{ModelHandle, PatientInput, Platform};
use crate::predict::{PredictionDispatcher, PredictionResult};
use crate::provision::{ModelSlot, Orchestrator, ProvisionReport, StoreDescriptor};
use crate::store;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Inputs to the startup sequence
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub training_timeout: Option<Duration>,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            csv_path: config.store.csv_path.clone(),
            db_path: config.store.db_path.clone(),
            training_timeout: config.training_timeout(),
        }
    }
}

/// Platform plus the model published for this process
pub struct PipelineContext {
    platform: Arc<dyn Platform>,
    model: ModelSlot,
}

impl PipelineContext {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            model: ModelSlot::new(),
        }
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.get()
    }

    pub fn publish(&self, model: ModelHandle) -> Result<&ModelHandle> {
        self.model.publish(model)
    }

    /// Dispatcher bound to the published model, if any
    pub fn dispatcher(&self) -> Option<PredictionDispatcher<'_>> {
        self.model
            .get()
            .map(|model| PredictionDispatcher::new(self.platform.as_ref(), model))
    }

    pub async fn try_predict(&self, input: &PatientInput) -> std::result::Result<PredictionResult, PredictionError> {
        let dispatcher = self.dispatcher().ok_or(PredictionError::ModelUnavailable)?;
        dispatcher.try_predict(input).await
    }

    /// Predict for one patient; never fails
    pub async fn predict(&self, input: &PatientInput) -> PredictionResult {
        match self.try_predict(input).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Error during prediction");
                PredictionResult::sentinel()
            }
        }
    }
}

/// Result of a successful startup
pub struct Startup {
    pub context: PipelineContext,
    pub rows: u64,
    pub report: ProvisionReport,
}

/// Load the source file into the store and verify it, returning the row count
///
/// The store connection is closed before returning.
pub fn load_and_verify(csv_path: &Path, db_path: &Path) -> Result<u64> {
    let handle = store::load(csv_path, db_path)?;
    let rows = store::verify(&handle)?;
    handle.close().map_err(|e| PipelineError::Load {
        path: db_path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(rows)
}

/// Run the full startup sequence against `platform`
pub async fn start(platform: Arc<dyn Platform>, settings: &PipelineSettings) -> Result<Startup> {
    let rows = load_and_verify(&settings.csv_path, &settings.db_path)?;

    // The platform runs in another process, so register an absolute path
    let db_file = settings
        .db_path
        .canonicalize()
        .unwrap_or_else(|_| settings.db_path.clone());

    let context = PipelineContext::new(platform);
    let provisioned = Orchestrator::new(context.platform(), StoreDescriptor::new(db_file))
        .with_training_timeout(settings.training_timeout)
        .provision()
        .await?;

    context.publish(provisioned.model)?;

    Ok(Startup {
        context,
        rows,
        report: provisioned.report,
    })
}
