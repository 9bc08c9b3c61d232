use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::molecule::{AdminRoute, Molecule};

/// Stable identity of a recommendation within a single assessment.
///
/// Assigned sequentially as candidates are created, so an unchanged context
/// always yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecommendationId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RecommendationType {
    Safe,
    Caution,
    Unsafe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DrugRecommendation {
    pub id: RecommendationId,
    pub molecule: Molecule,
    pub route: Option<AdminRoute>,
    pub name: String,
    pub reason: String,
    pub detail: String,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
}

impl DrugRecommendation {
    pub fn is_safe(&self) -> bool {
        self.kind == RecommendationType::Safe
    }

    pub fn is(&self, molecule: Molecule, route: AdminRoute) -> bool {
        self.molecule == molecule && self.route == Some(route)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdjuvantRecommendation {
    /// e.g. "NSAID", "Gabapentinoid", "Topical", "Analgesic".
    pub category: String,
    pub drug: String,
    pub dose: String,
    pub rationale: String,
    pub route: AdminRoute,
}
