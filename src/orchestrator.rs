//! Training orchestrator: drives a training run against the dataset and
//! publishes the results into the shared model state.

use crate::model::scoring::FeatureImportance;
use crate::model::state::{ModelHandle, ModelPhase};
use crate::types::error::OrchestratorError;
use crate::types::record::StudentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Diagnostics for a completed training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Unique run identifier
    pub run_id: String,
    /// Accuracy proxy in [0.80, 0.95)
    pub accuracy: f64,
    /// Normalized per-feature importance
    pub importance: FeatureImportance,
    /// Number of records the run was fitted against
    pub records_used: usize,
    /// Run completion timestamp
    pub completed_at: DateTime<Utc>,
}

/// Mediates between the dataset and the scoring model.
///
/// Assumes single-flight invocation: a second `train_model` call while a
/// run is in flight is rejected, not queued.
pub struct TrainingOrchestrator {
    model: Arc<ModelHandle>,
    train_delay: Duration,
}

impl TrainingOrchestrator {
    pub fn new(model: Arc<ModelHandle>, train_delay: Duration) -> Self {
        Self { model, train_delay }
    }

    /// Run one training pass over `records`.
    ///
    /// Fails with [`OrchestratorError::NoData`] on an empty dataset (the
    /// model is left untouched) and [`OrchestratorError::TrainingInProgress`]
    /// when a run is already in flight. On success the accuracy and
    /// feature importance are published into the model state before the
    /// in-flight gate is released, so any prediction that starts after
    /// this call resolves observes the new weights.
    pub async fn train_model(
        &self,
        records: &[StudentRecord],
    ) -> Result<TrainingReport, OrchestratorError> {
        if records.is_empty() {
            warn!("Training requested with no records loaded");
            self.model
                .set_error(OrchestratorError::NoData.to_string())
                .await;
            return Err(OrchestratorError::NoData);
        }

        if !self.model.try_begin_training() {
            warn!("Rejected overlapping training run");
            return Err(OrchestratorError::TrainingInProgress);
        }

        let previous_phase = self.model.state().await.phase;
        self.model.clear_error().await;
        self.model.set_phase(ModelPhase::Training).await;
        info!(records = records.len(), "Training run started");

        // Simulated fitting latency; the lifecycle flag reads `Training`
        // for the whole suspension.
        sleep(self.train_delay).await;

        match self.model.train(records).await {
            Ok(outcome) => {
                self.model
                    .publish_training(outcome.accuracy, outcome.importance.clone())
                    .await;
                // Publish-then-unlock: results are visible before the
                // gate opens for the next run.
                self.model.end_training();

                let report = TrainingReport {
                    run_id: uuid::Uuid::new_v4().to_string(),
                    accuracy: outcome.accuracy,
                    importance: outcome.importance,
                    records_used: records.len(),
                    completed_at: Utc::now(),
                };
                info!(
                    run_id = %report.run_id,
                    accuracy = report.accuracy,
                    records = report.records_used,
                    "Training run complete"
                );
                Ok(report)
            }
            Err(e) => {
                self.model.set_error(e.to_string()).await;
                self.model.set_phase(previous_phase).await;
                self.model.end_training();
                warn!(error = %e, "Training run failed");
                Err(OrchestratorError::Model(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state::ModelPhase;

    fn records(n: u64) -> Vec<StudentRecord> {
        (0..n)
            .map(|i| StudentRecord::new(i, 4.0, 70.0, 85.0, 2.5, true))
            .collect()
    }

    fn orchestrator(model: &Arc<ModelHandle>, delay_ms: u64) -> TrainingOrchestrator {
        TrainingOrchestrator::new(model.clone(), Duration::from_millis(delay_ms))
    }

    #[tokio::test]
    async fn test_empty_dataset_is_rejected() {
        let model = Arc::new(ModelHandle::with_seed(1));
        let result = orchestrator(&model, 0).train_model(&[]).await;

        assert!(matches!(result, Err(OrchestratorError::NoData)));
        let state = model.state().await;
        assert_eq!(state.phase, ModelPhase::Untrained);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_successful_run_publishes_state() {
        let model = Arc::new(ModelHandle::with_seed(1));
        let report = orchestrator(&model, 0)
            .train_model(&records(30))
            .await
            .unwrap();

        assert!((0.80..0.95).contains(&report.accuracy));
        assert!((report.importance.total() - 1.0).abs() < 1e-9);
        assert_eq!(report.records_used, 30);

        let state = model.state().await;
        assert_eq!(state.phase, ModelPhase::Trained);
        assert_eq!(state.accuracy, Some(report.accuracy));
        assert!(state.importance.is_some());
        assert!(state.error.is_none());
        assert!(state.trained_at.is_some());
    }

    #[tokio::test]
    async fn test_retraining_keeps_model_trained() {
        let model = Arc::new(ModelHandle::with_seed(1));
        let orchestrator = orchestrator(&model, 0);

        let first = orchestrator.train_model(&records(10)).await.unwrap();
        let second = orchestrator.train_model(&records(10)).await.unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert!(model.state().await.is_trained());
        assert_eq!(model.state().await.accuracy, Some(second.accuracy));
    }

    #[tokio::test]
    async fn test_overlapping_runs_are_rejected() {
        let model = Arc::new(ModelHandle::with_seed(1));
        let slow = Arc::new(orchestrator(&model, 100));

        let background = {
            let slow = slow.clone();
            tokio::spawn(async move { slow.train_model(&records(5)).await })
        };
        // Let the first run reach its suspension point.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = slow.train_model(&records(5)).await;
        assert!(matches!(result, Err(OrchestratorError::TrainingInProgress)));

        background.await.unwrap().unwrap();
        assert!(model.state().await.is_trained());
    }

    #[tokio::test]
    async fn test_training_flag_reads_true_during_run() {
        let model = Arc::new(ModelHandle::with_seed(1));
        let slow = Arc::new(orchestrator(&model, 100));

        let background = {
            let slow = slow.clone();
            tokio::spawn(async move { slow.train_model(&records(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(model.state().await.is_training());
        background.await.unwrap().unwrap();
        assert!(!model.state().await.is_training());
    }
}
