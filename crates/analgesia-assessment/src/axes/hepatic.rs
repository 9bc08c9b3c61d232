use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{HepaticStatus, PatientContext};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};
use crate::axes::starting_dose;

pub struct Hepatic;

impl Axis for Hepatic {
    fn name(&self) -> &str {
        "hepatic"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        match ctx.hepatic {
            HepaticStatus::Normal => {}
            HepaticStatus::Impaired => {
                for rec in acc.recommendations_mut() {
                    if !rec.detail.contains("Reduce") {
                        rec.detail.push_str(" Reduce initial dose 50%.");
                    }
                }
            }
            HepaticStatus::Failure => failure(ctx, acc),
        }

        if ctx.hepatic.is_impaired() && ctx.renal.is_impaired() {
            acc.warn("Glucuronidation Overlap: Morphine and Hydromorphone Metabolites accumulate with combined renal and hepatic impairment. Fentanyl preferred.");
        }
    }
}

fn failure(ctx: &PatientContext, acc: &mut Accumulator) {
    acc.warn("Liver Failure: Avoid Morphine, Codeine, Methadone, Tramadol, Meperidine.");
    // Oxycodone bioavailability is unpredictable with portosystemic shunting.
    acc.remove_where(|r| r.molecule.is_hepatotoxic_choice() || r.molecule == Molecule::Oxycodone);

    acc.ensure_front(
        Draft::drug(Molecule::Fentanyl, AdminRoute::Iv, RecommendationType::Safe)
            .reason("Preferred.")
            .detail(format!(
                "Safest choice (No hepatic metabolism). {}",
                starting_dose(ctx, Molecule::Fentanyl, AdminRoute::Iv)
            )),
    );

    for rec in acc.recommendations_mut() {
        match (rec.molecule, rec.route) {
            (Molecule::Hydromorphone, Some(AdminRoute::Po)) => {
                rec.kind = RecommendationType::Caution;
                rec.reason = "Caution (Shunt Risk)".to_string();
                rec.detail = "Bioavailability increases 4x. Start 1mg PO. Extended interval.".to_string();
            }
            (Molecule::Hydromorphone, Some(AdminRoute::Iv)) => {
                rec.kind = RecommendationType::Caution;
                rec.reason = "Caution.".to_string();
                rec.detail = "Reduced hepatic clearance prolongs effect. Reduce dose 50%. Extended interval.".to_string();
            }
            _ => {
                if !rec.detail.contains("Reduce") {
                    rec.detail.push_str(" Reduce dose 50%.");
                }
            }
        }
    }
}
