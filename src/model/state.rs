//! Shared model handle and published model state.
//!
//! The handle is the single mutation funnel for the scoring model: the
//! training orchestrator and the prediction service go through it, and
//! everyone else only reads [`ModelState`] snapshots.

use crate::model::scoring::{FeatureImportance, ScoringModel, TrainingOutcome};
use crate::types::error::ModelError;
use crate::types::record::{ModelFeatures, StudentRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Lifecycle phase of the scoring model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPhase {
    Untrained,
    Training,
    Trained,
}

/// Published snapshot of the model lifecycle and last diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub phase: ModelPhase,
    /// Transient overlay raised while a prediction is in flight
    pub is_predicting: bool,
    /// Accuracy proxy from the last completed training run
    pub accuracy: Option<f64>,
    /// Feature importance from the last completed training run
    pub importance: Option<FeatureImportance>,
    /// Latest user-visible error, cleared at the start of the next attempt
    pub error: Option<String>,
    /// Completion time of the last training run
    pub trained_at: Option<DateTime<Utc>>,
}

impl ModelState {
    fn initial() -> Self {
        Self {
            phase: ModelPhase::Untrained,
            is_predicting: false,
            accuracy: None,
            importance: None,
            error: None,
            trained_at: None,
        }
    }

    pub fn is_training(&self) -> bool {
        self.phase == ModelPhase::Training
    }

    pub fn is_trained(&self) -> bool {
        self.phase == ModelPhase::Trained
    }
}

impl Default for ModelState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Shared handle owning the scoring model and its published state.
pub struct ModelHandle {
    model: RwLock<ScoringModel>,
    state: RwLock<ModelState>,
    /// In-flight training gate; held for the whole run, released only
    /// after results are published (publish-then-unlock)
    training: AtomicBool,
}

impl ModelHandle {
    /// Create a handle around an entropy-seeded model.
    pub fn new() -> Self {
        Self::from_model(ScoringModel::new())
    }

    /// Create a handle around a fixed-seed model, for deterministic runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_model(ScoringModel::with_seed(seed))
    }

    fn from_model(model: ScoringModel) -> Self {
        Self {
            model: RwLock::new(model),
            state: RwLock::new(ModelState::initial()),
            training: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current published state.
    pub async fn state(&self) -> ModelState {
        self.state.read().await.clone()
    }

    /// Whether the last completed lifecycle transition left the model trained.
    pub async fn is_trained(&self) -> bool {
        self.state.read().await.is_trained()
    }

    /// Discard weights and return model and state to their initial shape.
    pub async fn reset(&self) {
        self.model.write().await.reset();
        *self.state.write().await = ModelState::initial();
    }

    /// Try to acquire the in-flight training gate.
    pub(crate) fn try_begin_training(&self) -> bool {
        self.training
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Release the training gate. Callers publish results first.
    pub(crate) fn end_training(&self) {
        self.training.store(false, Ordering::Release);
    }

    /// Run the model fit. The write lock is held only for the fit itself,
    /// never across a suspension point.
    pub(crate) async fn train(
        &self,
        records: &[StudentRecord],
    ) -> Result<TrainingOutcome, ModelError> {
        self.model.write().await.train(records)
    }

    /// Score one feature set against the current weights.
    pub(crate) async fn predict(&self, features: &ModelFeatures) -> Result<u32, ModelError> {
        self.model.read().await.predict(features)
    }

    pub(crate) async fn set_phase(&self, phase: ModelPhase) {
        self.state.write().await.phase = phase;
    }

    pub(crate) async fn set_predicting(&self, predicting: bool) {
        self.state.write().await.is_predicting = predicting;
    }

    pub(crate) async fn set_error(&self, message: impl Into<String>) {
        self.state.write().await.error = Some(message.into());
    }

    pub(crate) async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    /// Publish the diagnostics of a completed training run and mark the
    /// model trained.
    pub(crate) async fn publish_training(&self, accuracy: f64, importance: FeatureImportance) {
        let mut state = self.state.write().await;
        state.phase = ModelPhase::Trained;
        state.accuracy = Some(accuracy);
        state.importance = Some(importance);
        state.error = None;
        state.trained_at = Some(Utc::now());
    }
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new()
    }
}
