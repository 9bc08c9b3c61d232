use analgesia_core::models::patient::{GiStatus, PatientContext};

use crate::Axis;
use crate::accumulator::Accumulator;

/// GI status against the planned route. NPO beats a PO preference.
pub struct RouteAndGi;

impl Axis for RouteAndGi {
    fn name(&self) -> &str {
        "route"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        match ctx.gi {
            GiStatus::Intact => {}
            GiStatus::Npo => {
                acc.remove_where(|r| r.route.is_some_and(|route| route.is_enteral()));
                if ctx.route.includes_po() {
                    acc.warn("NPO Status: Oral route contraindicated. Use IV or transdermal alternatives.");
                }
            }
            GiStatus::Tube => {
                acc.warn("Tube Feeds: do NOT crush ER/LA formulations. Use liquid formulation or immediate-release tablets.");
            }
        }
    }
}
