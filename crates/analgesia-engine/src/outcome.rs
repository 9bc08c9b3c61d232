use analgesia_assessment::risk::RiskAssessment;
use analgesia_core::models::recommendation::{AdjuvantRecommendation, DrugRecommendation};
use analgesia_dosing::infusion::{DripSummary, PcaLimits};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Everything shown for one patient context, after the safety gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentOutcome {
    pub recommendations: Vec<DrugRecommendation>,
    pub adjuvants: Vec<AdjuvantRecommendation>,
    /// Generator, risk, advisory and context warnings, deduplicated in that order.
    pub warnings: Vec<String>,
    pub gate_failures: Vec<String>,
    pub risk: RiskAssessment,
    pub monitoring_plan: Vec<String>,
}

impl AssessmentOutcome {
    /// Whether the gate had to intervene.
    pub fn gate_tripped(&self) -> bool {
        !self.gate_failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PcaReport {
    pub limits: PcaLimits,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DripReport {
    pub summary: DripSummary,
    pub risk_multiplier: f64,
    pub warnings: Vec<String>,
}
