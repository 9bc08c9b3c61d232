use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{AnalgesicProfile, PatientContext, RenalStatus};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};
use crate::axes::starting_dose;

/// eGFR < 60 or dialysis: drop agents with renally cleared active
/// metabolites, lead with fentanyl, down-tier hydromorphone and oxycodone.
pub struct Renal;

impl Axis for Renal {
    fn name(&self) -> &str {
        "renal"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        if !ctx.renal.is_impaired() {
            return;
        }
        let dialysis = ctx.renal == RenalStatus::Dialysis;

        acc.warn("Avoid: Morphine, Codeine, Tramadol, Meperidine.");
        acc.remove_molecules(&[Molecule::Morphine, Molecule::Codeine, Molecule::Meperidine, Molecule::Tramadol]);

        acc.ensure_front(
            Draft::drug(Molecule::Fentanyl, AdminRoute::Iv, RecommendationType::Safe)
                .reason("Preferred.")
                .detail(format!(
                    "Safest renal option (No metabolites). {}",
                    starting_dose(ctx, Molecule::Fentanyl, AdminRoute::Iv)
                )),
        );

        for rec in acc.recommendations_mut() {
            match (rec.molecule, rec.route) {
                (Molecule::Hydromorphone, Some(route)) => {
                    let dose = starting_dose(ctx, Molecule::Hydromorphone, route);
                    rec.kind = RecommendationType::Caution;
                    if dialysis {
                        rec.reason = "Strict Caution.".to_string();
                        rec.detail = format!("Accumulates between sessions. Reduce dose 50%. {dose}");
                    } else {
                        rec.reason = "Caution.".to_string();
                        rec.detail = format!("Reduce dose 50%. Watch for H3G. {dose}");
                    }
                }
                (Molecule::Oxycodone, Some(AdminRoute::Po)) => {
                    rec.kind = RecommendationType::Caution;
                    rec.reason = "Caution.".to_string();
                    rec.detail = format!(
                        "Reduce frequency. Monitor sedation. {}",
                        starting_dose(ctx, Molecule::Oxycodone, AdminRoute::Po)
                    );
                }
                _ => {}
            }
        }

        // Tolerant patients only; methadone is never a naive start.
        let tolerant = matches!(ctx.profile, AnalgesicProfile::ChronicRx | AnalgesicProfile::HighPotency);
        if tolerant && ctx.route.includes_po() && !ctx.is_npo() {
            acc.push(
                Draft::new(
                    Molecule::Methadone,
                    Some(AdminRoute::Po),
                    RecommendationType::Safe,
                    "Methadone PO (Expert Consult)",
                )
                .reason("Safe Option.")
                .detail("No renal metabolites. Consult Specialist."),
            );
        }
    }
}
