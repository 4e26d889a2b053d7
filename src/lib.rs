//! Student Performance Prediction Pipeline Library
//!
//! A lightweight predictive scoring pipeline: tabular record ingestion,
//! mock linear model training, and single-record/batch scoring, with the
//! state coordination that keeps the dataset, trained model, and
//! per-record predictions mutually consistent.

pub mod config;
pub mod ingest;
pub mod model;
pub mod orchestrator;
pub mod service;
pub mod store;
pub mod types;

pub use config::AppConfig;
pub use ingest::RecordIngestor;
pub use model::{FeatureImportance, ModelHandle, ModelPhase, ModelState, ScoringModel};
pub use orchestrator::{TrainingOrchestrator, TrainingReport};
pub use service::PredictionService;
pub use store::DatasetStore;
pub use types::{
    IngestError, ModelError, ModelFeatures, OrchestratorError, ScoreReport, ServiceError,
    StudentRecord,
};
