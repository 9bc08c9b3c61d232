//! Opioid-induced respiratory depression risk score.
//!
//! Additive point table over PRODIGY and RIOSORD factors. The breakdown
//! always sums to the score.

use analgesia_core::models::patient::{AnalgesicProfile, PatientContext, Sex};
use analgesia_core::models::risk::{RiskAuditItem, RiskTier};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const HIGH_THRESHOLD: u32 = 21;
const INTERMEDIATE_THRESHOLD: u32 = 10;

pub const BENZODIAZEPINE_WARNING: &str =
    "BLACK BOX WARNING: Concurrent Benzos increase overdose risk 3.8x. Taper if possible; if unavoidable use lowest doses and monitor closely.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskAssessment {
    pub score: u32,
    pub tier: RiskTier,
    pub breakdown: Vec<RiskAuditItem>,
    pub monitoring_plan: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScoreCalculator;

impl RiskScoreCalculator {
    /// Itemized points; the score is their sum.
    pub fn breakdown(&self, ctx: &PatientContext) -> Vec<RiskAuditItem> {
        let mut items = Vec::new();
        let mut add = |factor: &str, points: u32| {
            items.push(RiskAuditItem {
                factor: factor.to_string(),
                points,
            })
        };

        match ctx.age_years() {
            Some(age) if age >= 80 => add("Age ≥ 80", 16),
            Some(age) if age >= 70 => add("Age 70-79", 12),
            Some(age) if age >= 60 => add("Age 60-69", 8),
            _ => {}
        }
        if ctx.sex == Sex::Male {
            add("Male Sex", 3);
        }
        if ctx.chf {
            add("Congestive Heart Failure", 5);
        }
        if ctx.sleep_apnea {
            add("Sleep Apnea (OSA)", 5);
        }
        if ctx.profile == AnalgesicProfile::Naive {
            add("Opioid Naive", 3);
        }
        if ctx.history_overdose {
            add("History of Overdose/SUD", 25);
        }
        if ctx.psych_history {
            add("Psychiatric History", 10);
        }
        if ctx.benzos {
            add("Benzodiazepines", 9);
        }
        if ctx.renal.is_impaired() {
            add("Renal Impairment", 8);
        }
        if ctx.copd {
            add("COPD", 5);
        }
        if ctx.hepatic.is_failure() {
            add("Hepatic Failure", 7);
        }
        if ctx.current_mme_value() >= 100.0 {
            add("High Dose (>100 MME)", 7);
        }
        items
    }

    pub fn assess(&self, ctx: &PatientContext) -> RiskAssessment {
        let breakdown = self.breakdown(ctx);
        let score = breakdown.iter().map(|i| i.points).sum();

        let mut tier = if score >= HIGH_THRESHOLD {
            RiskTier::High
        } else if score >= INTERMEDIATE_THRESHOLD {
            RiskTier::Intermediate
        } else {
            RiskTier::Low
        };
        // Post-hoc override, not a scored factor.
        if ctx.benzos && tier == RiskTier::Low {
            tier = RiskTier::Intermediate;
        }

        let mut warnings = Vec::new();
        if ctx.benzos {
            warnings.push(BENZODIAZEPINE_WARNING.to_string());
        }

        tracing::debug!(score, tier = tier.label(), "risk scored");

        RiskAssessment {
            score,
            tier,
            breakdown,
            monitoring_plan: monitoring_plan(ctx, tier),
            warnings,
        }
    }
}

fn monitoring_plan(ctx: &PatientContext, tier: RiskTier) -> Vec<String> {
    let mut plan = vec![
        match tier {
            RiskTier::High => "HIGH RISK: Continuous Capnography + Pulse Oximetry. Naloxone at bedside. q1h nursing assessment. Consider 10-25% dose reduction.",
            RiskTier::Intermediate => "INTERMEDIATE RISK: Consider continuous Capnography. q2h nursing assessment.",
            RiskTier::Low => "Standard monitoring (q4h vitals and sedation scale).",
        }
        .to_string(),
    ];

    if ctx.copd {
        plan.push("COPD: Target SpO2 88-92% (Risk of CO2 retention).".to_string());
    }
    if ctx.benzos {
        plan.push("Benzodiazepines: Stagger administration times; assess sedation before each opioid dose.".to_string());
    }
    if ctx.history_overdose || ctx.current_mme_value() >= 90.0 {
        plan.push("Naloxone: Prescribe rescue kit at discharge and educate caregivers.".to_string());
    }
    if ctx.history_overdose {
        plan.push("Urine drug screen + PDMP review on admission.".to_string());
        plan.push("Limited Supply: Short prescriptions with daily dispense where available.".to_string());
    }
    if ctx.tolerance_uncertain || ctx.profile == AnalgesicProfile::HighPotency {
        plan.push("Unpredictable Tolerance: Titrate from test doses with close sedation monitoring.".to_string());
    }
    if ctx.qtc_prolonged || ctx.profile == AnalgesicProfile::Methadone {
        plan.push("ECG: Baseline and periodic QTc monitoring.".to_string());
    }
    plan
}
