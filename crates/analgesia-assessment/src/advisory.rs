//! Multimodal advice that sits beside the opioid list: non-opioid agents,
//! respiratory-depression alerts and lactation notes.

use analgesia_core::models::molecule::AdminRoute;
use analgesia_core::models::patient::{PainType, PatientContext, RenalStatus};
use analgesia_core::models::recommendation::AdjuvantRecommendation;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::risk::BENZODIAZEPINE_WARNING;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafetyAdvice {
    pub adjuvants: Vec<AdjuvantRecommendation>,
    pub warnings: Vec<String>,
    pub monitoring: Vec<String>,
}

impl SafetyAdvice {
    fn adjuvant(&mut self, category: &str, drug: &str, dose: &str, rationale: &str, route: AdminRoute) {
        self.adjuvants.push(AdjuvantRecommendation {
            category: category.to_string(),
            drug: drug.to_string(),
            dose: dose.to_string(),
            rationale: rationale.to_string(),
            route,
        });
    }

    fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyAdvisory;

impl SafetyAdvisory {
    pub fn generate(&self, ctx: &PatientContext) -> SafetyAdvice {
        let mut advice = SafetyAdvice::default();

        suzetrigine(ctx, &mut advice);

        if ctx.current_mme_value() >= 50.0 {
            advice.warn(
                "CDC Guideline: Current dose >= 50 MME/day. Reassess benefit vs. risk and offer Naloxone.",
            );
        }

        respiratory(ctx, &mut advice);

        match ctx.renal {
            RenalStatus::Dialysis => advice.adjuvant(
                "Gabapentinoid",
                "Gabapentin",
                "100mg PO Post-HD",
                "Renally cleared. Dose after dialysis only.",
                AdminRoute::Po,
            ),
            RenalStatus::Impaired => advice.adjuvant(
                "Gabapentinoid",
                "Gabapentin",
                "100-300mg PO daily (Renal Dose)",
                "Reduce dose for eGFR < 60.",
                AdminRoute::Po,
            ),
            RenalStatus::Normal => {}
        }
        if ctx.age_at_least(80) {
            advice.warn("Gabapentinoids in age >= 80: Sedation and fall risk. Start at lowest dose.");
        }

        if ctx.hepatic.is_failure() {
            advice.adjuvant(
                "Analgesic",
                "Acetaminophen",
                "Max 2g/day",
                "Reduced ceiling in hepatic failure.",
                AdminRoute::Po,
            );
        } else {
            advice.adjuvant(
                "Analgesic",
                "Acetaminophen",
                "650mg q6h (Max 4g/day)",
                "Opioid-sparing baseline.",
                AdminRoute::Po,
            );
        }

        if ctx.is_breastfeeding {
            advice.warn(
                "LACTATION: Use lowest effective opioid dose for the shortest duration. Avoid Codeine and Tramadol.",
            );
            advice
                .monitoring
                .push("Infant: Monitor for sedation, feeding difficulty and breathing pauses.".to_string());
        }

        advice
    }
}

fn suzetrigine(ctx: &PatientContext, advice: &mut SafetyAdvice) {
    if ctx.pain_type != PainType::Nociceptive {
        return;
    }
    if ctx.renal == RenalStatus::Dialysis || ctx.hepatic.is_failure() {
        advice.warn("Suzetrigine: Not studied in dialysis or hepatic failure. Avoid.");
        return;
    }
    let rationale = if ctx.sleep_apnea {
        "Preferred in OSA: NaV1.8 blockade without respiratory depression."
    } else {
        "Non-opioid NaV1.8 blocker for moderate-severe acute pain."
    };
    advice.adjuvant(
        "NaV1.8 Inhibitor",
        "Suzetrigine",
        "100mg PO load, then 50mg q12h",
        rationale,
        AdminRoute::Po,
    );
}

fn respiratory(ctx: &PatientContext, advice: &mut SafetyAdvice) {
    let respiratory_risks = [ctx.benzos, ctx.copd, ctx.sleep_apnea]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if ctx.benzos && (ctx.copd || ctx.sleep_apnea) {
        advice.warn(
            "CRITICAL: TRIPLE THREAT (Opioids + Benzos + Respiratory Disease). Extreme risk of respiratory arrest.",
        );
        advice
            .monitoring
            .push("Continuous Capnography and Pulse Oximetry required.".to_string());
    } else if respiratory_risks >= 2 {
        advice.warn("RESPIRATORY ALERT: Multiple respiratory depression risks. Reduce opioid dose.");
    } else {
        if ctx.benzos {
            advice.warn(BENZODIAZEPINE_WARNING);
        }
        if ctx.copd || ctx.sleep_apnea {
            advice.warn("Respiratory Risk: Compromised drive. Titrate slowly and monitor SpO2.");
        }
    }
}
