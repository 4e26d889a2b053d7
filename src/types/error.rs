//! Error taxonomy for the scoring pipeline.
//!
//! Every error here is recoverable and user-visible: components surface
//! failures as data to their caller, the coordinating state objects keep
//! the latest message for display, and the user re-triggers the action.

use thiserror::Error;

/// Errors raised while ingesting tabular data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The tabular parser reported a structural error (e.g. malformed
    /// quoting). Individual dirty cells are coerced, never raised.
    #[error("failed to parse tabular data: {0}")]
    ParseFailure(String),
}

/// Errors raised by the scoring model itself.
#[derive(Debug, Error)]
pub enum ModelError {
    /// `predict` was called before any training run completed.
    #[error("model has not been trained yet")]
    NotTrained,

    /// `train` was called with an empty record set.
    #[error("cannot train on an empty record set")]
    NoData,
}

/// Errors raised by the training orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No records were available; the model is left untouched.
    #[error("no data available for training; upload or generate records first")]
    NoData,

    /// A training run is already in flight; overlapping runs are
    /// rejected rather than queued.
    #[error("a training run is already in progress")]
    TrainingInProgress,

    /// The underlying model refused the training request.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised by the prediction service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Prediction was requested before the model reached `Trained`.
    #[error("model must be trained before making predictions")]
    ModelNotTrained,

    /// Batch prediction was requested against an empty dataset.
    #[error("no data available for prediction")]
    NoData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ModelError::NotTrained.to_string(),
            "model has not been trained yet"
        );
        assert_eq!(
            ServiceError::NoData.to_string(),
            "no data available for prediction"
        );
    }

    #[test]
    fn test_model_error_propagates_through_orchestrator() {
        let err = OrchestratorError::from(ModelError::NoData);
        assert_eq!(err.to_string(), ModelError::NoData.to_string());
    }
}
