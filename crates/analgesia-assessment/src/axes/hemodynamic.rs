use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{Hemodynamics, PatientContext};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};
use crate::axes::starting_dose;

pub struct Hemodynamic;

impl Axis for Hemodynamic {
    fn name(&self) -> &str {
        "hemodynamic"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        if ctx.hemodynamics != Hemodynamics::Unstable {
            return;
        }

        acc.remove_molecules(&[Molecule::Morphine]);
        acc.ensure_front(
            Draft::drug(Molecule::Fentanyl, AdminRoute::Iv, RecommendationType::Safe)
                .reason("Preferred.")
                .detail(format!(
                    "Cardiostable. {}",
                    starting_dose(ctx, Molecule::Fentanyl, AdminRoute::Iv)
                )),
        );
        acc.warn("HEMODYNAMIC INSTABILITY: Morphine removed (Histamine release causes vasodilation and hypotension). Fentanyl preferred.");

        if ctx.route.includes_po() {
            acc.warn("Shock: Oral Absorption unreliable due to gut hypoperfusion. Use IV route.");
        }
    }
}
