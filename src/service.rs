//! Prediction service: applies the trained model to one ad-hoc feature
//! set or to every record in the dataset store.

use crate::config::AppConfig;
use crate::model::state::ModelHandle;
use crate::store::DatasetStore;
use crate::types::assessment::ScoreReport;
use crate::types::error::ServiceError;
use crate::types::record::ModelFeatures;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Scores records with the trained model and writes batch results back
/// to the dataset store. Each record is scored independently; batch
/// order never affects the result.
pub struct PredictionService {
    model: Arc<ModelHandle>,
    store: Arc<DatasetStore>,
    predict_delay: Duration,
    batch_delay: Duration,
    risk_threshold: f64,
}

impl PredictionService {
    pub fn new(model: Arc<ModelHandle>, store: Arc<DatasetStore>, config: &AppConfig) -> Self {
        Self {
            model,
            store,
            predict_delay: config.pipeline.predict_delay(),
            batch_delay: config.pipeline.batch_delay(),
            risk_threshold: config.assessment.risk_threshold,
        }
    }

    /// Score one ad-hoc feature set.
    ///
    /// Requires a trained model; fails with
    /// [`ServiceError::ModelNotTrained`] otherwise and never touches the
    /// dataset store.
    pub async fn predict_one(&self, features: &ModelFeatures) -> Result<u32, ServiceError> {
        if !self.model.is_trained().await {
            self.model
                .set_error(ServiceError::ModelNotTrained.to_string())
                .await;
            return Err(ServiceError::ModelNotTrained);
        }

        self.model.clear_error().await;
        self.model.set_predicting(true).await;
        sleep(self.predict_delay).await;

        let result = self.model.predict(features).await;
        self.model.set_predicting(false).await;

        match result {
            Ok(score) => {
                debug!(score = score, "Single prediction complete");
                Ok(score)
            }
            // The model lost its weights between the check and the call
            // (an interleaved reset); surface it the same way.
            Err(e) => {
                warn!(error = %e, "Single prediction failed");
                self.model
                    .set_error(ServiceError::ModelNotTrained.to_string())
                    .await;
                Err(ServiceError::ModelNotTrained)
            }
        }
    }

    /// Score one ad-hoc feature set and derive the full report: risk
    /// classification and study recommendations.
    pub async fn predict_one_report(
        &self,
        features: &ModelFeatures,
    ) -> Result<ScoreReport, ServiceError> {
        let score = self.predict_one(features).await?;
        Ok(ScoreReport::new(score, features.clone(), self.risk_threshold))
    }

    /// Score every record currently in the dataset store and attach the
    /// results.
    ///
    /// Fails with [`ServiceError::ModelNotTrained`] before training and
    /// [`ServiceError::NoData`] on an empty store; neither failure
    /// mutates the store's records.
    pub async fn predict_batch(&self) -> Result<HashMap<u64, u32>, ServiceError> {
        if !self.model.is_trained().await {
            self.model
                .set_error(ServiceError::ModelNotTrained.to_string())
                .await;
            return Err(ServiceError::ModelNotTrained);
        }

        let records = self.store.records().await;
        if records.is_empty() {
            self.model
                .set_error(ServiceError::NoData.to_string())
                .await;
            return Err(ServiceError::NoData);
        }

        self.model.clear_error().await;
        self.model.set_predicting(true).await;
        sleep(self.batch_delay).await;

        let mut predictions = HashMap::with_capacity(records.len());
        for record in &records {
            match self.model.predict(&record.features()).await {
                Ok(score) => {
                    predictions.insert(record.id, score);
                }
                Err(e) => {
                    self.model.set_predicting(false).await;
                    warn!(record_id = record.id, error = %e, "Batch prediction failed");
                    self.model
                        .set_error(ServiceError::ModelNotTrained.to_string())
                        .await;
                    return Err(ServiceError::ModelNotTrained);
                }
            }
        }

        self.store.attach_predictions(&predictions).await;
        self.model.set_predicting(false).await;

        info!(records = predictions.len(), "Batch prediction complete");
        Ok(predictions)
    }
}
