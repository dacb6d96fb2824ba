//! Publish-once holder for the trained model

use crate::errors::{PipelineError, Result};
use crate::platform::ModelHandle;
use std::sync::OnceLock;

/// Empty until provisioning succeeds, then immutable for the process
#[derive(Debug, Default)]
pub struct ModelSlot {
    inner: OnceLock<ModelHandle>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the trained model; a second publish is rejected
    pub fn publish(&self, model: ModelHandle) -> Result<&ModelHandle> {
        self.inner
            .set(model)
            .map_err(|_| PipelineError::AlreadyPublished)?;
        self.inner.get().ok_or(PipelineError::AlreadyPublished)
    }

    pub fn get(&self) -> Option<&ModelHandle> {
        self.inner.get()
    }

    pub fn is_published(&self) -> bool {
        self.inner.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ModelStatus;
    use std::sync::Arc;

    fn handle(name: &str) -> ModelHandle {
        ModelHandle {
            project: "health_diagnosis".to_string(),
            name: name.to_string(),
            status: ModelStatus::Complete,
        }
    }

    #[test]
    fn test_empty_until_published() {
        let slot = ModelSlot::new();
        assert!(!slot.is_published());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_publish_once() {
        let slot = ModelSlot::new();
        let published = slot.publish(handle("diagnosis_predictor")).unwrap();
        assert_eq!(published.name, "diagnosis_predictor");

        let second = slot.publish(handle("other"));
        assert!(matches!(second, Err(PipelineError::AlreadyPublished)));
        assert_eq!(slot.get().unwrap().name, "diagnosis_predictor");
    }

    #[test]
    fn test_visible_across_threads() {
        let slot = Arc::new(ModelSlot::new());
        slot.publish(handle("diagnosis_predictor")).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || slot.get().map(|m| m.name.clone()))
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.join().unwrap().as_deref(), Some("diagnosis_predictor"));
        }
    }
}
