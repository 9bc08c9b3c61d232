//! Conversion from a total daily MME to a methadone starting regimen.
//!
//! Methadone potency rises with prior opioid exposure, so the ratio is a
//! tiered table rather than a constant. The conversion is one-way.

use analgesia_core::models::patient::{HepaticStatus, PatientContext, RenalStatus};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rounding::{round_half, round_half_down};

const APS_FLOOR_MG_DAY: f64 = 7.5;
const ABSOLUTE_CEILING_MG_DAY: f64 = 40.0;

const STANDARD_PROTOCOL: [&str; 8] = [
    "METHADONE SAFETY PROTOCOL:",
    "TITRATION: Do NOT increase dose before 5-7 days.",
    "INCREMENT: Max increase 5mg/day (up to 30-40mg total).",
    "ECG required: Baseline, 2-4 weeks, and at 100mg/day.",
    "Avoid if QTc >500ms; Caution if 450-500ms.",
    "Monitor for delayed respiratory depression (peak 2-4 days).",
    "Provide naloxone rescue kit.",
    "UNIDIRECTIONAL conversion - do NOT use reverse calculation.",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConversionMethod {
    /// Stop the prior opioid and start methadone at target.
    #[default]
    Rapid,
    /// Three-step cross-titration over a week.
    Stepwise,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct MethadoneRequest {
    pub total_mme: f64,
    pub age: Option<u32>,
    pub method: ConversionMethod,
    pub renal: RenalStatus,
    pub hepatic: HepaticStatus,
    pub is_pregnant: bool,
    pub is_breastfeeding: bool,
    pub benzos: bool,
    pub oud_context: bool,
    pub qtc_prolonged: bool,
    /// Replaces the table's cross-tolerance reduction, in percent.
    pub manual_reduction_percent: Option<f64>,
}

impl MethadoneRequest {
    pub fn from_context(ctx: &PatientContext, total_mme: f64, method: ConversionMethod) -> Self {
        Self {
            total_mme,
            age: ctx.age_years(),
            method,
            renal: ctx.renal,
            hepatic: ctx.hepatic,
            is_pregnant: ctx.is_pregnant,
            is_breastfeeding: ctx.is_breastfeeding,
            benzos: ctx.benzos,
            oud_context: ctx.oud_context,
            qtc_prolonged: ctx.qtc_prolonged,
            manual_reduction_percent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MethadoneStep {
    pub label: String,
    /// Per administration, TID.
    pub methadone_dose: f64,
    pub methadone_daily: f64,
    pub previous_opioid_percent: u32,
    pub previous_opioid_mme: u32,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MethadoneConversionResult {
    pub total_daily_dose: f64,
    pub individual_dose: f64,
    pub dosing_schedule: String,
    pub warnings: Vec<String>,
    pub is_contraindicated_for_calculator: bool,
    pub schedule: Option<Vec<MethadoneStep>>,
    pub ratio_used: f64,
    /// Fraction, 0.0 to 1.0.
    pub reduction_applied: f64,
    /// Dose the standard adult table would have produced, when an elderly
    /// or hepatic adjustment lowered it.
    pub original_daily_dose: Option<f64>,
}

struct RatioRule {
    min_mme: f64,
    max_mme: f64,
    elderly_only: bool,
    ratio: f64,
    reduction: f64,
    max_daily: Option<f64>,
    warning: Option<&'static str>,
}

impl RatioRule {
    fn covers(&self, mme: f64) -> bool {
        mme >= self.min_mme && mme < self.max_mme
    }
}

static RATIO_RULES: [RatioRule; 7] = [
    RatioRule {
        min_mme: 60.0,
        max_mme: 200.0,
        elderly_only: true,
        ratio: 20.0,
        reduction: 0.0,
        max_daily: None,
        warning: Some("Elderly (>65y): Applied conservative 20:1 ratio per NCCN."),
    },
    RatioRule {
        min_mme: 0.0,
        max_mme: 30.0,
        elderly_only: false,
        ratio: 2.0,
        reduction: 0.0,
        max_daily: None,
        warning: Some("Low baseline MME: Consider fixed starting dose of 2.5mg TID per APS guidelines."),
    },
    RatioRule {
        min_mme: 30.0,
        max_mme: 100.0,
        elderly_only: false,
        ratio: 4.0,
        reduction: 0.0,
        max_daily: None,
        warning: Some("NCCN recommends fixed dose range 2-7.5mg/day for <60mg baseline morphine."),
    },
    RatioRule {
        min_mme: 100.0,
        max_mme: 300.0,
        elderly_only: false,
        ratio: 8.0,
        reduction: 0.0,
        max_daily: None,
        warning: Some("NCCN/VA Ratio (8:1) for 100-299 MME range."),
    },
    RatioRule {
        min_mme: 300.0,
        max_mme: 500.0,
        elderly_only: false,
        ratio: 12.0,
        reduction: 0.0,
        max_daily: Some(45.0),
        warning: Some("VA/DoD conservative ratio."),
    },
    RatioRule {
        min_mme: 500.0,
        max_mme: 1000.0,
        elderly_only: false,
        ratio: 15.0,
        reduction: 0.0,
        max_daily: Some(45.0),
        warning: None,
    },
    RatioRule {
        min_mme: 1000.0,
        max_mme: f64::INFINITY,
        elderly_only: false,
        ratio: 20.0,
        reduction: 0.0,
        max_daily: Some(40.0),
        warning: Some("APS Maximum Limit."),
    },
];

fn lookup_rule(mme: f64, elderly: bool) -> Option<&'static RatioRule> {
    RATIO_RULES
        .iter()
        .filter(|r| elderly || !r.elderly_only)
        .find(|r| r.covers(mme))
}

/// Stateless methadone calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethadoneConversionEngine;

impl MethadoneConversionEngine {
    pub fn calculate(&self, req: &MethadoneRequest) -> MethadoneConversionResult {
        let mut warnings = hard_safety_warnings(req);

        if req.qtc_prolonged {
            tracing::warn!(total_mme = req.total_mme, "methadone hard stop: QTc prolongation");
            return contraindicated(warnings);
        }

        let elderly = req.age.is_some_and(|a| a >= 65);
        let Some(rule) = lookup_rule(req.total_mme, elderly) else {
            tracing::warn!(total_mme = req.total_mme, "methadone hard stop: no ratio rule");
            return contraindicated(warnings);
        };

        let reduction = match req.manual_reduction_percent {
            Some(percent) => percent.clamp(0.0, 100.0) / 100.0,
            None => rule.reduction,
        };

        if let Some(warning) = rule.warning {
            warnings.push(warning.to_string());
        }

        let mut daily = req.total_mme / rule.ratio;
        if reduction > 0.0 {
            daily *= 1.0 - reduction;
            warnings.push(format!(
                "Applied {}% reduction for incomplete cross-tolerance.",
                (reduction * 100.0) as u32
            ));
        }

        let mut original_daily_dose = None;
        if rule.elderly_only {
            original_daily_dose = lookup_rule(req.total_mme, false).map(|std| req.total_mme / std.ratio);
        }

        if req.hepatic.is_failure() {
            original_daily_dose.get_or_insert(daily);
            daily *= 0.5;
            warnings.push(
                "HEPATIC FAILURE: Methadone clearance reduced. Dose reduced by 50%. Titrate slowly.".to_string(),
            );
        }

        if daily < APS_FLOOR_MG_DAY && req.total_mme >= 30.0 {
            daily = APS_FLOOR_MG_DAY;
            warnings.push("Note: Dose rounded up to APS minimum (2.5mg TID).".to_string());
        }

        if daily > ABSOLUTE_CEILING_MG_DAY {
            daily = ABSOLUTE_CEILING_MG_DAY;
            warnings.push("Dose CAPPED at 40mg/day (Guideline Safety Limit).".to_string());
        } else if let Some(max) = rule.max_daily.filter(|max| daily > *max) {
            daily = max;
            warnings.push(format!("Dose capped at {max}mg/day per NCCN/APS guidelines."));
        }

        if elderly && req.total_mme >= 60.0 {
            warnings.push("ELDERLY PATIENT: Using more conservative NCCN ratios.".to_string());
        }

        // Round the individual dose first, then derive the daily total from it.
        // The absolute ceiling must still hold after rounding.
        let mut individual_dose = round_half(daily / 3.0);
        if individual_dose * 3.0 > ABSOLUTE_CEILING_MG_DAY {
            individual_dose = round_half_down(daily / 3.0);
        }
        let total_daily_dose = individual_dose * 3.0;

        warnings.extend(STANDARD_PROTOCOL.iter().map(|w| w.to_string()));

        let schedule = match req.method {
            ConversionMethod::Rapid => None,
            ConversionMethod::Stepwise => {
                warnings.push("STEPWISE INDUCTION: Follow the 3-Step Transition Schedule below.".to_string());
                Some(stepwise_schedule(total_daily_dose, individual_dose, req.total_mme))
            }
        };

        tracing::debug!(
            total_mme = req.total_mme,
            ratio = rule.ratio,
            total_daily_dose,
            "methadone conversion computed"
        );

        MethadoneConversionResult {
            total_daily_dose,
            individual_dose,
            dosing_schedule: "Every 8 hours (TID)".to_string(),
            warnings,
            is_contraindicated_for_calculator: false,
            schedule,
            ratio_used: rule.ratio,
            reduction_applied: reduction,
            original_daily_dose,
        }
    }
}

/// Advisory text evaluated before any dose math.
fn hard_safety_warnings(req: &MethadoneRequest) -> Vec<String> {
    let mut warnings = Vec::new();
    if req.hepatic.is_failure() && req.renal.is_impaired() {
        warnings.push("HEPATORENAL SYNDROME: Extreme caution. Consider alternative opioid (e.g., fentanyl, buprenorphine). Specialist consultation mandatory.".to_string());
    }
    if req.is_pregnant {
        warnings.push("PREGNANCY: Methadone conversion requires Maternal-Fetal Medicine and Addiction Medicine consultation. Risk of Neonatal Abstinence Syndrome (NAS). Do NOT abruptly discontinue prior opioid.".to_string());
    }
    if req.is_breastfeeding {
        warnings.push("LACTATION: Methadone is secreted in breast milk. Breastfeeding is generally encouraged if the patient is stable on MAT, but infant must be monitored for sedation and weight gain.".to_string());
    }
    if req.benzos {
        warnings.push("BLACK BOX WARNING: Concurrent benzodiazepines increase risk of fatal respiratory depression. Taper benzodiazepines if possible. If unavoidable, use lowest effective doses and monitor closely.".to_string());
    }
    if req.oud_context {
        warnings.push("OUD CONTEXT: This calculator is designed for PAIN management. For OUD, consult Addiction Medicine. Typical OUD doses (60-120mg+) differ from Pain protocols.".to_string());
    }
    if req.qtc_prolonged {
        warnings.push("QTc PROLONGATION (>500ms): Methadone is CONTRAINDICATED. Risk of Torsades de Pointes. Consult Cardiology/Pain Specialist.".to_string());
    }
    warnings
}

fn contraindicated(mut warnings: Vec<String>) -> MethadoneConversionResult {
    warnings.push("SPECIALIST CONSULTATION MANDATORY".to_string());
    warnings.extend(STANDARD_PROTOCOL.iter().map(|w| w.to_string()));
    MethadoneConversionResult {
        total_daily_dose: 0.0,
        individual_dose: 0.0,
        dosing_schedule: "Consult Pain Specialist".to_string(),
        warnings,
        is_contraindicated_for_calculator: true,
        schedule: None,
        ratio_used: 0.0,
        reduction_applied: 0.0,
        original_daily_dose: None,
    }
}

fn stepwise_schedule(total_daily: f64, individual: f64, total_mme: f64) -> Vec<MethadoneStep> {
    let step = |fraction: f64| round_half(total_daily * fraction / 3.0);
    let step1 = step(0.33);
    let step2 = step(0.66);
    vec![
        MethadoneStep {
            label: "Days 1-3".to_string(),
            methadone_dose: step1,
            methadone_daily: step1 * 3.0,
            previous_opioid_percent: 66,
            previous_opioid_mme: (total_mme * 0.66) as u32,
            instruction: "Continue PRN breakthrough.".to_string(),
        },
        MethadoneStep {
            label: "Days 4-6".to_string(),
            methadone_dose: step2,
            methadone_daily: step2 * 3.0,
            previous_opioid_percent: 33,
            previous_opioid_mme: (total_mme * 0.33) as u32,
            instruction: "Monitor for sedation.".to_string(),
        },
        MethadoneStep {
            label: "Day 7+".to_string(),
            methadone_dose: individual,
            methadone_daily: individual * 3.0,
            previous_opioid_percent: 0,
            previous_opioid_mme: 0,
            instruction: "Full Target Dose Reached.".to_string(),
        },
    ]
}
