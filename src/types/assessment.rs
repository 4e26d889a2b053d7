//! Per-prediction assessment data structures

use crate::types::record::ModelFeatures;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feature that contributed to an at-risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LowStudyHours,
    LowPreviousPerformance,
    PoorAttendance,
    HighSubjectDifficulty,
    LimitedInternetAccess,
    /// No single dominant factor could be identified.
    MultipleMinorFactors,
}

/// Risk classification for one predicted score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// True when the predicted score falls below the risk threshold
    pub at_risk: bool,
    /// Features that contributed to the classification (empty when not at risk)
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// Classify a predicted score against the given threshold.
    pub fn evaluate(score: u32, features: &ModelFeatures, threshold: f64) -> Self {
        if f64::from(score) >= threshold {
            return Self {
                at_risk: false,
                factors: Vec::new(),
            };
        }

        let mut factors = Vec::new();
        if features.study_hours < 2.0 {
            factors.push(RiskFactor::LowStudyHours);
        }
        if features.previous_score < 65.0 {
            factors.push(RiskFactor::LowPreviousPerformance);
        }
        if features.attendance < 75.0 {
            factors.push(RiskFactor::PoorAttendance);
        }
        if features.difficulty >= 4.0 {
            factors.push(RiskFactor::HighSubjectDifficulty);
        }
        if !features.internet_access {
            factors.push(RiskFactor::LimitedInternetAccess);
        }
        if factors.is_empty() {
            factors.push(RiskFactor::MultipleMinorFactors);
        }

        Self {
            at_risk: true,
            factors,
        }
    }
}

/// Full report for a single interactive prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Unique report identifier
    pub report_id: String,

    /// Predicted score in [0, 100]
    pub predicted_score: u32,

    /// The feature set that was scored
    pub features: ModelFeatures,

    /// Risk classification for this prediction
    pub risk: RiskAssessment,

    /// Personalized study recommendations
    pub recommendations: Vec<String>,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl ScoreReport {
    /// Build a report for a predicted score, deriving risk factors and
    /// study recommendations from the input features.
    pub fn new(predicted_score: u32, features: ModelFeatures, risk_threshold: f64) -> Self {
        let risk = RiskAssessment::evaluate(predicted_score, &features, risk_threshold);
        let recommendations =
            study_recommendations(predicted_score, &features, risk_threshold);

        Self {
            report_id: uuid::Uuid::new_v4().to_string(),
            predicted_score,
            features,
            risk,
            recommendations,
            timestamp: Utc::now(),
        }
    }
}

/// Derive study recommendations from a prediction and its inputs.
pub fn study_recommendations(
    score: u32,
    features: &ModelFeatures,
    risk_threshold: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if features.study_hours < 3.0 {
        let extra = (5.0 - features.study_hours).min(2.0);
        recommendations.push(format!(
            "Increase your daily study time by {extra:.1} hours"
        ));
    }

    if features.attendance < 80.0 {
        recommendations.push(format!(
            "Improve your attendance from {:.0}% to at least 85%",
            features.attendance
        ));
    }

    if features.difficulty >= 4.0 && f64::from(score) < risk_threshold {
        recommendations
            .push("Consider breaking down complex topics into smaller, manageable parts".into());
        recommendations.push("Try using flashcards to simplify difficult concepts".into());
    }

    if features.previous_score < 70.0 {
        recommendations.push("Review fundamental concepts from previous materials".into());
    }

    if !features.internet_access {
        recommendations.push("Try to find access to online educational resources".into());
    }

    if recommendations.is_empty() {
        recommendations.push("Maintain your current study habits".into());
        recommendations
            .push("Consider participating in study groups for additional insights".into());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(study: f64, previous: f64, attendance: f64, difficulty: f64) -> ModelFeatures {
        ModelFeatures {
            study_hours: study,
            previous_score: previous,
            attendance,
            difficulty,
            internet_access: true,
        }
    }

    #[test]
    fn test_not_at_risk_above_threshold() {
        let risk = RiskAssessment::evaluate(85, &features(1.0, 50.0, 60.0, 5.0), 70.0);
        assert!(!risk.at_risk);
        assert!(risk.factors.is_empty());
    }

    #[test]
    fn test_risk_factors_match_cutoffs() {
        let risk = RiskAssessment::evaluate(40, &features(1.5, 60.0, 70.0, 4.5), 70.0);
        assert!(risk.at_risk);
        assert_eq!(
            risk.factors,
            vec![
                RiskFactor::LowStudyHours,
                RiskFactor::LowPreviousPerformance,
                RiskFactor::PoorAttendance,
                RiskFactor::HighSubjectDifficulty,
            ]
        );
    }

    #[test]
    fn test_at_risk_without_obvious_factor() {
        let risk = RiskAssessment::evaluate(69, &features(6.0, 80.0, 90.0, 2.0), 70.0);
        assert!(risk.at_risk);
        assert_eq!(risk.factors, vec![RiskFactor::MultipleMinorFactors]);
    }

    #[test]
    fn test_recommendations_for_strong_student() {
        let recs = study_recommendations(90, &features(6.0, 85.0, 95.0, 2.0), 70.0);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("Maintain"));
    }

    #[test]
    fn test_recommendations_for_struggling_student() {
        let mut f = features(1.0, 50.0, 60.0, 4.5);
        f.internet_access = false;
        let recs = study_recommendations(40, &f, 70.0);

        assert!(recs.iter().any(|r| r.contains("study time")));
        assert!(recs.iter().any(|r| r.contains("attendance")));
        assert!(recs.iter().any(|r| r.contains("flashcards")));
        assert!(recs.iter().any(|r| r.contains("online educational resources")));
    }

    #[test]
    fn test_report_serialization() {
        let report = ScoreReport::new(55, features(2.0, 60.0, 70.0, 4.0), 70.0);

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: ScoreReport = serde_json::from_str(&json).unwrap();

        assert_eq!(report.predicted_score, deserialized.predicted_score);
        assert_eq!(report.risk.at_risk, deserialized.risk.at_risk);
    }
}
