//! Pipeline stages, one file per clinical axis.

pub mod adjuvants;
pub mod baseline;
pub mod demographic;
pub mod finalize;
pub mod hemodynamic;
pub mod hepatic;
pub mod indication;
pub mod profile;
pub mod referrals;
pub mod renal;
pub mod route;

use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::PatientContext;

/// Naive starting dose for a first-line agent, lower from age 70.
/// Tolerant patients get "Titrate to effect".
pub fn starting_dose(ctx: &PatientContext, molecule: Molecule, route: AdminRoute) -> &'static str {
    if !ctx.profile.is_naive() {
        return "Titrate to effect";
    }
    let elderly = ctx.age_at_least(70);
    match (molecule, route) {
        (Molecule::Morphine, AdminRoute::Iv) => pick(elderly, "Start 1-2mg", "Start 2-4mg"),
        (Molecule::Hydromorphone, AdminRoute::Iv) => pick(elderly, "Start 0.2-0.4mg", "Start 0.2-0.5mg"),
        (Molecule::Fentanyl, AdminRoute::Iv) => pick(elderly, "Start 12.5-25mcg", "Start 25-50mcg"),
        (Molecule::Oxycodone, AdminRoute::Po) => pick(elderly, "Start 2.5-5mg", "Start 5-10mg"),
        (Molecule::Morphine, AdminRoute::Po) => pick(elderly, "Start 7.5-15mg", "Start 15-30mg"),
        (Molecule::Hydromorphone, AdminRoute::Po) => pick(elderly, "Start 1-2mg", "Start 2-4mg"),
        _ => "Titrate to effect",
    }
}

fn pick(elderly: bool, reduced: &'static str, standard: &'static str) -> &'static str {
    if elderly { reduced } else { standard }
}
