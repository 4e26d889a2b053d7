//! Student record data structures

use serde::{Deserialize, Serialize};

/// One student to be scored by the pipeline.
///
/// Created in bulk by record ingestion; `predicted_score` is the only
/// field mutated after creation, and only by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Stable identifier, assigned as the 0-based row index at ingestion
    pub id: u64,

    /// Daily study hours (non-negative)
    pub study_hours: f64,

    /// Score from the previous assessment (expected 0-100)
    pub previous_score: f64,

    /// Attendance percentage (expected 0-100)
    pub attendance: f64,

    /// Subject difficulty (expected 1-5)
    pub difficulty: f64,

    /// Whether the student has internet access at home
    pub internet_access: bool,

    /// Predicted score, present only after a prediction has been computed
    #[serde(default)]
    pub predicted_score: Option<u32>,
}

impl StudentRecord {
    /// Create a record with no prediction attached.
    pub fn new(
        id: u64,
        study_hours: f64,
        previous_score: f64,
        attendance: f64,
        difficulty: f64,
        internet_access: bool,
    ) -> Self {
        Self {
            id,
            study_hours,
            previous_score,
            attendance,
            difficulty,
            internet_access,
            predicted_score: None,
        }
    }

    /// Project the model inputs out of this record.
    pub fn features(&self) -> ModelFeatures {
        ModelFeatures {
            study_hours: self.study_hours,
            previous_score: self.previous_score,
            attendance: self.attendance,
            difficulty: self.difficulty,
            internet_access: self.internet_access,
        }
    }
}

/// The feature set consumed by the scoring model.
///
/// Either projected from a [`StudentRecord`] or collected ad hoc from a
/// form for interactive prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFeatures {
    pub study_hours: f64,
    pub previous_score: f64,
    pub attendance: f64,
    pub difficulty: f64,
    pub internet_access: bool,
}
