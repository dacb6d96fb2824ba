//! Platform provisioning
//!
//! The orchestrator ensures the data source, project and trained model
//! exist; the resulting handle is published once into a `ModelSlot`.

pub mod handle;
pub mod orchestrator;

pub use handle::ModelSlot;
pub use orchestrator::{
    provision, training_query, Orchestrator, ProvisionReport, Provisioned, StepOutcome,
    StoreDescriptor, DATA_SOURCE_NAME, MODEL_NAME, PROJECT_NAME, TARGET_COLUMN,
};
