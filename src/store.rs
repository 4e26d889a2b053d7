//! Dataset store: the single source of truth for ingested records.

use crate::types::record::StudentRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Process-wide store for the current record collection.
///
/// Interior mutability behind `&self` so the store can be shared via
/// `Arc` across the pipeline components. Mutated only by ingestion
/// (`replace`), reset (`clear`), and the prediction service
/// (`attach_predictions`).
pub struct DatasetStore {
    records: RwLock<Vec<StudentRecord>>,
    /// Raised while an ingestion load is in flight
    loading: AtomicBool,
    /// Latest user-visible ingestion error, cleared on the next attempt
    error: RwLock<Option<String>>,
}

impl DatasetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    /// Atomically swap the whole collection.
    ///
    /// Does not touch the scoring model: a caller that wants fresh
    /// weights must retrain explicitly, and may deliberately re-predict
    /// with a stale model.
    pub async fn replace(&self, records: Vec<StudentRecord>) {
        debug_assert!(
            {
                let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
                ids.sort_unstable();
                ids.windows(2).all(|w| w[0] != w[1])
            },
            "record ids must be unique within a snapshot"
        );

        let count = records.len();
        *self.records.write().await = records;
        debug!(records = count, "Dataset replaced");
    }

    /// Empty the collection and clear any stored error.
    pub async fn clear(&self) {
        self.records.write().await.clear();
        *self.error.write().await = None;
        debug!("Dataset cleared");
    }

    /// Attach predicted scores to the records whose ids appear in the
    /// mapping; all other records are left untouched. Idempotent.
    pub async fn attach_predictions(&self, predictions: &HashMap<u64, u32>) {
        let mut records = self.records.write().await;
        let mut updated = 0usize;

        for record in records.iter_mut() {
            if let Some(&score) = predictions.get(&record.id) {
                record.predicted_score = Some(score);
                updated += 1;
            }
        }

        debug!(updated = updated, "Predictions attached");
    }

    /// Snapshot of the current collection.
    pub async fn records(&self) -> Vec<StudentRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Whether an ingestion load is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::Release);
    }

    /// Latest stored error message, if any.
    pub async fn last_error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub(crate) async fn set_error(&self, message: impl Into<String>) {
        *self.error.write().await = Some(message.into());
    }

    pub(crate) async fn clear_error(&self) {
        *self.error.write().await = None;
    }
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}
