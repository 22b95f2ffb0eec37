use serde::{Deserialize, Serialize};

use crate::model::{ClassProbabilities, Verdict};

/// Qualitative certainty derived from how far the approval probability sits from even odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_probability(approval_probability: f64) -> Self {
        let p = approval_probability;
        if p > 0.7 || p < 0.3 {
            ConfidenceLevel::High
        } else if p > 0.6 || p < 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low (Borderline)",
        }
    }
}

/// Classifier output for one applicant, with the threshold it was judged against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub verdict: Verdict,
    pub probabilities: ClassProbabilities,
    pub approval_probability: f64,
    pub threshold: f64,
    /// Approval probability minus the threshold.
    pub margin: f64,
    pub confidence: ConfidenceLevel,
}

impl LoanDecision {
    pub fn new(probabilities: ClassProbabilities, threshold: f64) -> Self {
        let approval_probability = probabilities.approved;
        let verdict = if approval_probability >= threshold {
            Verdict::Approved
        } else {
            Verdict::Denied
        };

        Self {
            verdict,
            probabilities,
            approval_probability,
            threshold,
            margin: approval_probability - threshold,
            confidence: ConfidenceLevel::from_probability(approval_probability),
        }
    }

    pub fn approved(&self) -> bool {
        self.verdict == Verdict::Approved
    }

    pub fn summary(&self) -> String {
        let headline = if self.approved() {
            "likely to be approved"
        } else {
            "likely to be denied"
        };

        format!(
            "{headline} (approval probability {:.1}%, {:+.1}% vs threshold, confidence {})",
            self.approval_probability * 100.0,
            self.margin * 100.0,
            self.confidence.label()
        )
    }
}
