use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{AnalgesicProfile, ClinicalIndication, PatientContext};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};
use crate::axes::starting_dose;

pub struct Indication;

impl Axis for Indication {
    fn name(&self) -> &str {
        "indication"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        match ctx.indication {
            ClinicalIndication::Standard => {}
            ClinicalIndication::Postoperative => {
                if ctx.route.includes_iv() && ctx.profile != AnalgesicProfile::Naltrexone {
                    acc.push(
                        Draft::drug(Molecule::Fentanyl, AdminRoute::Iv, RecommendationType::Safe)
                            .reason("Procedural.")
                            .detail(format!(
                                "Rapid onset for incident and procedural pain. {}",
                                starting_dose(ctx, Molecule::Fentanyl, AdminRoute::Iv)
                            )),
                    );
                }
            }
            ClinicalIndication::Dyspnea => {
                // Fentanyl does little for air hunger, so it is never added here.
                if ctx.renal.is_impaired() {
                    acc.warn("Dyspnea: Morphine is first-line for air hunger, but its Metabolites accumulate in renal impairment. Prefer low-dose Hydromorphone.");
                }
            }
            ClinicalIndication::Cancer => {
                acc.warn("Cancer Pain: Schedule a long-acting opioid with breakthrough dosing (10-20% of daily dose). Consider Palliative Care consult.");
            }
        }
    }
}
