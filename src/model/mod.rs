//! Scoring model and its shared lifecycle state

pub mod scoring;
pub mod state;

pub use scoring::{FeatureImportance, ScoringModel, TrainingOutcome};
pub use state::{ModelHandle, ModelPhase, ModelState};
