use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::PatientContext;
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};
use crate::axes::starting_dose;

/// First-line candidates for the planned route, oral before parenteral.
pub struct Baseline;

impl Axis for Baseline {
    fn name(&self) -> &str {
        "baseline"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        let dose = |m, r| starting_dose(ctx, m, r);

        if ctx.route.includes_po() {
            acc.push(
                Draft::drug(Molecule::Oxycodone, AdminRoute::Po, RecommendationType::Safe)
                    .reason("Preferred.")
                    .detail(format!("Superior bioavailability. {}", dose(Molecule::Oxycodone, AdminRoute::Po))),
            );
            acc.push(
                Draft::drug(Molecule::Morphine, AdminRoute::Po, RecommendationType::Safe)
                    .reason("Standard.")
                    .detail(format!("Reliable option. {}", dose(Molecule::Morphine, AdminRoute::Po))),
            );
            acc.push(
                Draft::drug(Molecule::Hydromorphone, AdminRoute::Po, RecommendationType::Safe)
                    .reason("Alternative.")
                    .detail(format!(
                        "High-potency oral option. {}",
                        dose(Molecule::Hydromorphone, AdminRoute::Po)
                    )),
            );
        }

        if ctx.route.includes_iv() {
            acc.push(
                Draft::drug(Molecule::Morphine, AdminRoute::Iv, RecommendationType::Safe)
                    .reason("Standard.")
                    .detail(format!("Ideal first-line. {}", dose(Molecule::Morphine, AdminRoute::Iv))),
            );
            acc.push(
                Draft::drug(Molecule::Hydromorphone, AdminRoute::Iv, RecommendationType::Safe)
                    .reason("Standard.")
                    .detail(format!(
                        "Preferred in high tolerance. {}",
                        dose(Molecule::Hydromorphone, AdminRoute::Iv)
                    )),
            );
        }
    }
}
