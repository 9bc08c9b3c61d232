use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{Hemodynamics, PatientContext};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::Accumulator;

/// Invariants that hold whatever the earlier axes did.
pub struct Finalize;

impl Axis for Finalize {
    fn name(&self) -> &str {
        "finalize"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        let unstable = ctx.hemodynamics == Hemodynamics::Unstable;

        // Ketamine is never "safe" in an unstable patient.
        if unstable {
            for rec in acc.recommendations_mut() {
                if rec.molecule == Molecule::Ketamine && rec.kind == RecommendationType::Safe {
                    rec.kind = RecommendationType::Caution;
                }
            }
        }

        // With organ or circulatory hazards, a safe fentanyl option sits in the top two.
        let hazard = unstable || ctx.renal.is_impaired() || ctx.hepatic.is_failure();
        if !hazard {
            return;
        }
        let fentanyl = acc
            .recommendations()
            .iter()
            .position(|r| r.is(Molecule::Fentanyl, AdminRoute::Iv) && r.is_safe());
        if fentanyl.is_some_and(|idx| idx > 1) {
            acc.hoist(Molecule::Fentanyl, AdminRoute::Iv);
        }
    }
}
