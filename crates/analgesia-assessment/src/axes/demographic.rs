use analgesia_core::models::patient::PatientContext;

use crate::Axis;
use crate::accumulator::Accumulator;

/// Populations in which CYP2D6 ultra-rapid metabolism of codeine and
/// tramadol is lethal: children, pregnancy, lactation.
pub struct Demographic;

impl Axis for Demographic {
    fn name(&self) -> &str {
        "demographic"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        let exclude = |acc: &mut Accumulator| {
            acc.remove_where(|r| r.molecule.is_ultra_rapid_metabolizer_risk());
        };

        if ctx.is_pediatric() {
            exclude(acc);
            acc.warn("Pediatric (<18y): Codeine and Tramadol contraindicated (FDA Black Box). Use weight-based dosing.");
        }

        if ctx.is_pregnant {
            exclude(acc);
            acc.warn("Pregnancy: Avoid Codeine/Tramadol (Ultra-rapid metabolism risk to fetus). Consult OB/Maternal-Fetal Medicine.");
            if ctx.profile.is_chronic() {
                acc.warn("Pregnancy + Chronic Opioids: Do NOT taper abruptly. Maternal withdrawal risks Preterm labor and fetal distress.");
            }
        }

        if ctx.is_breastfeeding {
            exclude(acc);
            acc.warn("Lactation: Avoid Codeine/Tramadol (Infant toxicity). Use lowest effective dose of short-acting agents.");
        }
    }
}
