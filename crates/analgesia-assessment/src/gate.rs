//! Second, independent pass over generated recommendations.
//!
//! Gates look only at each entry's molecule and the patient context, never
//! at how the entry was produced, so every generation path is covered.

use std::collections::BTreeSet;

use analgesia_core::models::molecule::Molecule;
use analgesia_core::models::patient::PatientContext;
use analgesia_core::models::recommendation::{DrugRecommendation, RecommendationId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GateReport {
    /// Human-readable gate failures, in evaluation order.
    pub errors: Vec<String>,
    /// Recommendations the caller must drop before display.
    pub removals: BTreeSet<RecommendationId>,
}

impl GateReport {
    fn fail(&mut self, rec: &DrugRecommendation, message: String) {
        tracing::warn!(id = rec.id.0, molecule = ?rec.molecule, "safety gate failure");
        self.errors.push(message);
        self.removals.insert(rec.id);
    }

    /// Drop every removed entry, keeping order.
    pub fn apply(&self, recs: Vec<DrugRecommendation>) -> Vec<DrugRecommendation> {
        recs.into_iter().filter(|r| !self.removals.contains(&r.id)).collect()
    }
}

const RENAL_UNSAFE: [Molecule; 3] = [Molecule::Morphine, Molecule::Codeine, Molecule::Meperidine];
const DECOMPENSATED_HEPATIC_UNSAFE: [Molecule; 5] = [
    Molecule::Morphine,
    Molecule::Codeine,
    Molecule::Tramadol,
    Molecule::Oxycodone,
    Molecule::Methadone,
];
const ULTRA_RAPID: [Molecule; 2] = [Molecule::Codeine, Molecule::Tramadol];

#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyGateValidator;

impl SafetyGateValidator {
    pub fn validate(&self, ctx: &PatientContext, recs: &[DrugRecommendation]) -> GateReport {
        let mut report = GateReport::default();

        if ctx.renal.is_impaired() {
            for rec in recs.iter().filter(|r| RENAL_UNSAFE.contains(&r.molecule)) {
                report.fail(
                    rec,
                    format!(
                        "SAFETY GATE FAILURE: {} recommended despite renal impairment (eGFR < 60). Removing Recommendation.",
                        rec.molecule
                    ),
                );
            }
        }

        if ctx.hepatic.is_failure() {
            if ctx.renal.is_impaired() || ctx.has_severe_encephalopathy() {
                for rec in recs.iter().filter(|r| DECOMPENSATED_HEPATIC_UNSAFE.contains(&r.molecule)) {
                    report.fail(
                        rec,
                        format!(
                            "SAFETY GATE FAILURE: {} prohibited in Decompensated Hepatic Failure (Hepatorenal/HE). Removing Recommendation.",
                            rec.molecule
                        ),
                    );
                }
            }
            if ctx.renal.is_impaired() {
                for rec in recs.iter().filter(|r| r.molecule == Molecule::Methadone) {
                    report.fail(
                        rec,
                        "SAFETY GATE FAILURE: Methadone prohibited in multi-organ dysfunction (Hepatic Failure + Renal Impairment). Consult Specialist.".to_string(),
                    );
                }
            }
        }

        if ctx.is_pregnant {
            for rec in recs.iter().filter(|r| ULTRA_RAPID.contains(&r.molecule)) {
                report.fail(rec, format!("PREGNANCY GATE: {} contraindicated. Removing.", rec.molecule));
            }
        }

        if ctx.is_pediatric() {
            for rec in recs.iter().filter(|r| ULTRA_RAPID.contains(&r.molecule)) {
                report.fail(
                    rec,
                    format!("PEDIATRIC GATE: {} contraindicated (FDA Black Box). Removing.", rec.molecule),
                );
            }
        }

        for rec in recs.iter().filter(|r| r.molecule == Molecule::Methadone) {
            if ctx.qtc_prolonged {
                report.fail(
                    rec,
                    "SAFETY GATE FAILURE: Methadone Risk (QTc Prolonged). High risk of Torsades. Contraindicated for new starts; use extreme caution if rotating OFF.".to_string(),
                );
            }
            if ctx.history_overdose && !ctx.profile.is_chronic() {
                report.errors.push(
                    "CRITICAL: Methadone in Naive/High-Risk Patient. Extreme risk of accumulation & respiratory depression. Specialist use only.".to_string(),
                );
            }
        }

        if ctx.is_breastfeeding {
            for rec in recs.iter().filter(|r| ULTRA_RAPID.contains(&r.molecule)) {
                report.fail(
                    rec,
                    format!("BREASTFEEDING GATE: {} contraindicated (FDA Black Box). Removing.", rec.molecule),
                );
            }
        }

        report
    }
}
