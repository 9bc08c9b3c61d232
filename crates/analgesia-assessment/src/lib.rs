//! analgesia-assessment
//!
//! Bedside assessment rules. Turns a `PatientContext` into ranked opioid
//! recommendations, adjuvants and warnings, then re-checks the result
//! against hard contraindications and scores respiratory-depression risk.
//! Pure functions over their inputs; no knowledge-base access.

pub mod accumulator;
pub mod advisory;
pub mod axes;
pub mod gate;
pub mod generator;
pub mod risk;
pub mod validation;

use analgesia_core::models::patient::PatientContext;

use accumulator::Accumulator;

/// One clinical axis of the recommendation pipeline.
///
/// Axes run in a fixed order over a shared [`Accumulator`]. Each may add
/// candidates, remove them by molecule, or rewrite the ones already present.
pub trait Axis: Send + Sync {
    /// Short identifier used in logs (e.g., "renal", "hepatic").
    fn name(&self) -> &str;

    /// Apply this axis's rules for the given patient.
    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator);
}

/// Return all axes in evaluation order.
pub fn all_axes() -> Vec<Box<dyn Axis>> {
    vec![
        Box::new(axes::baseline::Baseline),
        Box::new(axes::renal::Renal),
        Box::new(axes::hepatic::Hepatic),
        Box::new(axes::hemodynamic::Hemodynamic),
        Box::new(axes::route::RouteAndGi),
        Box::new(axes::indication::Indication),
        Box::new(axes::adjuvants::Adjuvants),
        Box::new(axes::demographic::Demographic),
        Box::new(axes::profile::Profile),
        Box::new(axes::referrals::Referrals),
        Box::new(axes::finalize::Finalize),
    ]
}

/// Look up an axis by name.
pub fn get_axis(name: &str) -> Option<Box<dyn Axis>> {
    all_axes().into_iter().find(|a| a.name() == name)
}
