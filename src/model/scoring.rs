//! Trainable linear scoring model.
//!
//! The "fit" is a mock: each coefficient is sampled from a fixed bounded
//! range that encodes the assumed direction and magnitude of its effect.
//! The stable contract is that weights land in the documented ranges,
//! importances normalize to 1, and predictions clamp to [0, 100] — not
//! real statistical accuracy.

use crate::types::error::ModelError;
use crate::types::record::{ModelFeatures, StudentRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trained coefficients, one per feature plus an intercept.
///
/// Owned exclusively by the model; never handed out for mutation.
#[derive(Debug, Clone)]
struct FeatureWeights {
    study_hours: f64,
    previous_score: f64,
    attendance: f64,
    difficulty: f64,
    internet_access: f64,
    intercept: f64,
}

/// Normalized absolute-weight contribution per feature.
///
/// Values are in [0, 1] and sum to 1 across the five features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureImportance {
    pub study_hours: f64,
    pub previous_score: f64,
    pub attendance: f64,
    pub difficulty: f64,
    pub internet_access: f64,
}

impl FeatureImportance {
    /// Sum across all five features (1.0 up to rounding for any trained model).
    pub fn total(&self) -> f64 {
        self.study_hours
            + self.previous_score
            + self.attendance
            + self.difficulty
            + self.internet_access
    }
}

/// Diagnostics produced by a training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Accuracy proxy in [0.80, 0.95)
    pub accuracy: f64,
    /// Normalized per-feature importance
    pub importance: FeatureImportance,
}

/// The trainable scoring model.
pub struct ScoringModel {
    weights: Option<FeatureWeights>,
    rng: StdRng,
}

impl ScoringModel {
    /// Create an untrained model with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self {
            weights: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an untrained model with a fixed seed, for deterministic runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            weights: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Whether a training run has completed since creation or the last reset.
    pub fn is_trained(&self) -> bool {
        self.weights.is_some()
    }

    /// Fit weights to the given records.
    ///
    /// Retraining overwrites any previous weights. Fails with
    /// [`ModelError::NoData`] on an empty record set.
    pub fn train(&mut self, records: &[StudentRecord]) -> Result<TrainingOutcome, ModelError> {
        if records.is_empty() {
            return Err(ModelError::NoData);
        }

        let weights = FeatureWeights {
            study_hours: self.rng.gen_range(3.0..5.0), // strongest positive effect
            previous_score: self.rng.gen_range(0.5..0.8),
            attendance: self.rng.gen_range(0.2..0.6),
            difficulty: self.rng.gen_range(-0.5..-0.3), // harder subjects drag scores down
            internet_access: self.rng.gen_range(0.1..0.2),
            intercept: self.rng.gen_range(20.0..40.0),
        };

        let total = weights.study_hours.abs()
            + weights.previous_score.abs()
            + weights.attendance.abs()
            + weights.difficulty.abs()
            + weights.internet_access.abs();

        let importance = FeatureImportance {
            study_hours: weights.study_hours.abs() / total,
            previous_score: weights.previous_score.abs() / total,
            attendance: weights.attendance.abs() / total,
            difficulty: weights.difficulty.abs() / total,
            internet_access: weights.internet_access.abs() / total,
        };

        let accuracy = self.rng.gen_range(0.80..0.95);

        debug!(
            records = records.len(),
            accuracy = accuracy,
            "Model weights fitted"
        );

        self.weights = Some(weights);

        Ok(TrainingOutcome {
            accuracy,
            importance,
        })
    }

    /// Score one feature set.
    ///
    /// Returns `intercept + Σ weight·value` (booleans as 0/1), rounded to
    /// the nearest integer and clamped into [0, 100]. Fails with
    /// [`ModelError::NotTrained`] before the first training run.
    pub fn predict(&self, features: &ModelFeatures) -> Result<u32, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotTrained)?;

        let mut score = weights.intercept;
        score += features.study_hours * weights.study_hours;
        score += features.previous_score * weights.previous_score;
        score += features.attendance * weights.attendance;
        score += features.difficulty * weights.difficulty;
        if features.internet_access {
            score += weights.internet_access;
        }

        Ok(score.round().clamp(0.0, 100.0) as u32)
    }

    /// Discard weights and return to the untrained state. Always succeeds.
    pub fn reset(&mut self) {
        self.weights = None;
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records(n: u64) -> Vec<StudentRecord> {
        (0..n)
            .map(|i| StudentRecord::new(i, 5.0, 70.0, 85.0, 3.0, true))
            .collect()
    }

    #[test]
    fn test_train_rejects_empty_input() {
        let mut model = ScoringModel::with_seed(7);
        assert!(matches!(model.train(&[]), Err(ModelError::NoData)));
        assert!(!model.is_trained());
    }

    #[test]
    fn test_trained_weights_land_in_documented_ranges() {
        for seed in 0..20 {
            let mut model = ScoringModel::with_seed(seed);
            model.train(&sample_records(5)).unwrap();

            let w = model.weights.as_ref().unwrap();
            assert!((3.0..5.0).contains(&w.study_hours));
            assert!((0.5..0.8).contains(&w.previous_score));
            assert!((0.2..0.6).contains(&w.attendance));
            assert!((-0.5..-0.3).contains(&w.difficulty));
            assert!((0.1..0.2).contains(&w.internet_access));
            assert!((20.0..40.0).contains(&w.intercept));
        }
    }

    #[test]
    fn test_importance_sums_to_one() {
        for seed in 0..20 {
            let mut model = ScoringModel::with_seed(seed);
            let outcome = model.train(&sample_records(5)).unwrap();
            assert!((outcome.importance.total() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_accuracy_proxy_range() {
        for seed in 0..20 {
            let mut model = ScoringModel::with_seed(seed);
            let outcome = model.train(&sample_records(5)).unwrap();
            assert!((0.80..0.95).contains(&outcome.accuracy));
        }
    }

    #[test]
    fn test_predict_requires_training() {
        let model = ScoringModel::with_seed(1);
        let features = sample_records(1)[0].features();
        assert!(matches!(model.predict(&features), Err(ModelError::NotTrained)));
    }

    #[test]
    fn test_predict_clamps_to_score_range() {
        let mut model = ScoringModel::with_seed(11);
        model.train(&sample_records(5)).unwrap();

        let extreme = ModelFeatures {
            study_hours: 1000.0,
            previous_score: 100.0,
            attendance: 100.0,
            difficulty: 1.0,
            internet_access: true,
        };
        assert_eq!(model.predict(&extreme).unwrap(), 100);

        let hopeless = ModelFeatures {
            study_hours: 0.0,
            previous_score: -500.0,
            attendance: 0.0,
            difficulty: 5.0,
            internet_access: false,
        };
        assert_eq!(model.predict(&hopeless).unwrap(), 0);

        for seed in 0..10 {
            let mut model = ScoringModel::with_seed(seed);
            model.train(&sample_records(3)).unwrap();
            let score = model.predict(&sample_records(1)[0].features()).unwrap();
            assert!(score <= 100);
        }
    }

    #[test]
    fn test_fixed_seed_is_deterministic() {
        let mut a = ScoringModel::with_seed(42);
        let mut b = ScoringModel::with_seed(42);

        let records = sample_records(10);
        let out_a = a.train(&records).unwrap();
        let out_b = b.train(&records).unwrap();

        assert_eq!(out_a.accuracy, out_b.accuracy);
        assert_eq!(out_a.importance, out_b.importance);

        let features = records[0].features();
        assert_eq!(a.predict(&features).unwrap(), b.predict(&features).unwrap());
    }

    #[test]
    fn test_retrain_overwrites_weights() {
        let mut model = ScoringModel::with_seed(3);
        let records = sample_records(5);

        model.train(&records).unwrap();
        let first = model.predict(&records[0].features()).unwrap();
        model.train(&records).unwrap();
        assert!(model.is_trained());

        // A fresh sample almost certainly shifts the score; the invariant
        // checked here is only that the model stays usable after retrain.
        let second = model.predict(&records[0].features()).unwrap();
        assert!(second <= 100);
        let _ = first;
    }

    #[test]
    fn test_reset_returns_to_untrained() {
        let mut model = ScoringModel::with_seed(9);
        model.train(&sample_records(2)).unwrap();
        assert!(model.is_trained());

        model.reset();
        assert!(!model.is_trained());
        assert!(matches!(
            model.predict(&sample_records(1)[0].features()),
            Err(ModelError::NotTrained)
        ));
    }
}
