//! Cross-field checks on the patient context: organ-failure interactions
//! and states that cannot both be true.

use analgesia_core::models::patient::{AnalgesicProfile, PatientContext, Sex};
use analgesia_core::models::recommendation::AdjuvantRecommendation;

const BLEEDING_AGENTS: [&str; 4] = ["NSAID", "Diclofenac", "Ibuprofen", "Naproxen"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextValidator;

impl ContextValidator {
    /// Warnings for `ctx`, given the adjuvants about to be shown.
    pub fn validate(&self, ctx: &PatientContext, adjuvants: &[AdjuvantRecommendation]) -> Vec<String> {
        let mut warnings = Vec::new();

        if ctx.is_hepatorenal() {
            warnings.push(
                "CRITICAL: Hepatorenal Syndrome Risk. Combined hepatic failure and renal impairment. Avoid nephrotoxins and renally cleared opioids.".to_string(),
            );
            if ctx.age_years().is_some() {
                warnings.push("Calculate MELD score to stratify hepatorenal mortality risk.".to_string());
            }
        }

        let bleeding_agent = adjuvants
            .iter()
            .any(|a| a.category == "NSAID" || BLEEDING_AGENTS.iter().any(|b| a.drug.contains(b)));
        if bleeding_agent && (ctx.hepatic.is_failure() || ctx.has_coagulopathy) {
            warnings.push(
                "BLEEDING RISK: NSAIDs with coagulopathy or hepatic failure. Avoid systemic NSAIDs.".to_string(),
            );
        }

        if ctx.hepatic.is_failure() {
            if ctx.benzos {
                warnings.push(
                    "HEPATIC ENCEPHALOPATHY RISK: Benzodiazepines may precipitate encephalopathy in liver failure.".to_string(),
                );
            }
            if ctx.has_ascites {
                warnings.push(
                    "ASCITES: Increased volume of distribution for hydrophilic drugs. Titrate cautiously.".to_string(),
                );
                if adjuvants.iter().any(|a| a.drug.contains("Gabapentin")) {
                    warnings.push("Gabapentin with ascites: Monitor for fluid shifts and sedation.".to_string());
                }
            }
            if ctx.has_severe_encephalopathy() {
                warnings.push(format!(
                    "CEREBRAL ORGAN FAILURE: Grade {} hepatic encephalopathy. Minimize all sedating agents.",
                    ctx.encephalopathy_grade
                ));
            }
        }

        if ctx.sex == Sex::Male && ctx.is_pregnant {
            warnings.push("DATA ERROR: Pregnancy selected for male patient.".to_string());
        }
        if ctx.sex == Sex::Male && ctx.is_breastfeeding {
            warnings.push("DATA ERROR: Breastfeeding selected for male patient.".to_string());
        }

        let mme = ctx.current_mme_value();
        if ctx.profile == AnalgesicProfile::Naive && mme > 0.0 {
            warnings.push(format!(
                "INCONSISTENCY: Patient marked 'Opioid Naive' but current MME is {mme}. Verify home regimen."
            ));
        }

        warnings
    }
}
