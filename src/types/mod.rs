//! Type definitions for the scoring pipeline

pub mod assessment;
pub mod error;
pub mod record;

pub use assessment::{RiskAssessment, RiskFactor, ScoreReport};
pub use error::{IngestError, ModelError, OrchestratorError, ServiceError};
pub use record::{ModelFeatures, StudentRecord};
