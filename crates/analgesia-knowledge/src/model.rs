use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The reference document as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct KnowledgeDocument {
    pub version: String,
    pub last_updated: jiff::civil::Date,
    #[serde(default)]
    pub global_warnings: Vec<String>,
    /// Evidence grade code -> human definition.
    #[serde(default)]
    pub evidence_quality_definitions: BTreeMap<String, String>,
    pub conversion_factors: BTreeMap<String, DrugFactors>,
    #[serde(default)]
    pub clinical_pharmacology: Option<BTreeMap<String, PharmacologyProfile>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DrugFactors {
    pub routes: Vec<ConversionFactor>,
    /// Active metabolites accumulate when renal clearance falls.
    #[serde(default)]
    pub renal_unsafe: bool,
    /// Prodrug activation or first-pass metabolism is unreliable in liver failure.
    #[serde(default)]
    pub hepatic_unsafe: bool,
}

/// `dose × factor = MME` for one drug via one route.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConversionFactor {
    pub route: String,
    pub factor: f64,
    pub unit: String,
    pub evidence_quality: String,
    pub source: String,
    pub citation: String,
    #[serde(default)]
    pub clinical_context: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Display metadata consumed by presentation layers only.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PharmacologyProfile {
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub route: String,
    #[serde(default)]
    pub mme_factor: Option<f64>,
    pub pk_profile: PkProfile,
    pub safety_profile: SafetyProfile,
    #[serde(default)]
    pub citations: Vec<String>,
    #[serde(default)]
    pub family_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PkProfile {
    pub onset: String,
    pub peak: String,
    pub duration: String,
    pub bioavailability: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SafetyProfile {
    pub renal_note: String,
    #[serde(default)]
    pub boxed_warning: Option<String>,
}
