//! Pipeline Registry: live controllers keyed by job id
use crate::controller::PipelineController;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Shared by the HTTP layer through an `Arc`. Entries stay until deleted.
#[derive(Debug, Default)]
pub struct PipelineRegistry {
    jobs: RwLock<HashMap<String, PipelineController>>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, job_id: &str) -> Option<PipelineController> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Insert or replace a controller. The key is the controller's own
    /// `job_id()`, so there is no separate id argument.
    pub async fn set(&self, controller: PipelineController) {
        let job_id = controller.job_id().to_string();
        self.jobs.write().await.insert(job_id, controller);
    }

    /// Like `set`, but only if the job id is free. Returns false on conflict.
    pub async fn register(&self, controller: PipelineController) -> bool {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(controller.job_id()) {
            return false;
        }
        jobs.insert(controller.job_id().to_string(), controller);
        true
    }

    pub async fn delete(&self, job_id: &str) -> bool {
        self.jobs.write().await.remove(job_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    pub async fn job_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.jobs.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitegate_core::PipelineOptions;

    #[tokio::test]
    async fn test_set_get_delete() {
        let registry = PipelineRegistry::new();
        registry
            .set(PipelineController::new("a", PipelineOptions::default()))
            .await;

        assert_eq!(registry.get("a").await.map(|c| c.job_id().to_string()), Some("a".into()));
        assert!(registry.get("b").await.is_none());
        assert!(registry.delete("a").await);
        assert!(!registry.delete("a").await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_register_refuses_existing_job() {
        let registry = PipelineRegistry::new();
        let options = PipelineOptions::default().with_max_repair_attempts(1);

        assert!(registry.register(PipelineController::new("a", options.clone())).await);
        assert!(!registry.register(PipelineController::new("a", PipelineOptions::default())).await);
        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get("a").await.unwrap().options().max_repair_attempts, 1);
    }

    #[tokio::test]
    async fn test_set_replaces_existing_job() {
        let registry = PipelineRegistry::new();
        registry
            .set(PipelineController::new("a", PipelineOptions::default()))
            .await;
        registry
            .set(PipelineController::new("a", PipelineOptions::default().with_max_repair_attempts(5)))
            .await;

        assert_eq!(registry.job_ids().await, vec!["a".to_string()]);
        assert_eq!(registry.get("a").await.unwrap().options().max_repair_attempts, 5);
    }
}
