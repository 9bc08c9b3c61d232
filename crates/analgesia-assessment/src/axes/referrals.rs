use analgesia_core::models::molecule::Molecule;
use analgesia_core::models::patient::{Hemodynamics, PainType, PatientContext, RenalStatus};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};

/// Non-pharmacologic and specialty referrals.
pub struct Referrals;

impl Axis for Referrals {
    fn name(&self) -> &str {
        "referrals"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        let mobilizable = ctx.hemodynamics == Hemodynamics::Stable
            && ctx.renal != RenalStatus::Dialysis
            && !ctx.hepatic.is_failure();
        if matches!(ctx.pain_type, PainType::Nociceptive | PainType::Bone) && mobilizable {
            acc.push(
                Draft::new(Molecule::Other, None, RecommendationType::Safe, "Physical Therapy")
                    .reason("Non-pharmacologic.")
                    .detail("Early mobilization and functional restoration reduce opioid requirements."),
            );
        }

        if ctx.history_overdose {
            acc.push(
                Draft::new(Molecule::Other, None, RecommendationType::Safe, "Addiction Medicine Consult")
                    .reason("Referral.")
                    .detail("Evaluate for OUD treatment and relapse prevention before discharge."),
            );
        }

        if ctx.current_mme_value() > 90.0 {
            acc.warn(">90 MME: Refer to Pain Management for regimen review and taper planning.");
        }
    }
}
