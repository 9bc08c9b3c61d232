use std::collections::BTreeMap;
use std::path::Path;

use crate::error::KnowledgeError;
use crate::is_permitted_zero_factor;
use crate::model::{ConversionFactor, DrugFactors, KnowledgeDocument, PharmacologyProfile};

const BUNDLED: &str = include_str!("../data/drug_database.json");

/// Validated, read-only drug reference table.
///
/// Construct once at start-up and share behind an `Arc`; there is no way to
/// mutate it after load.
#[derive(Debug, Clone)]
pub struct DrugKnowledgeBase {
    document: KnowledgeDocument,
}

impl DrugKnowledgeBase {
    /// The reference table compiled into the binary.
    pub fn bundled() -> Result<Self, KnowledgeError> {
        Self::from_json(BUNDLED)
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeError> {
        let contents = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let kb = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), "knowledge base loaded from file");
        Ok(kb)
    }

    pub fn from_json(json: &str) -> Result<Self, KnowledgeError> {
        let document: KnowledgeDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Validate every factor before handing out a usable table.
    pub fn from_document(document: KnowledgeDocument) -> Result<Self, KnowledgeError> {
        for (drug_id, drug) in &document.conversion_factors {
            if drug.routes.is_empty() {
                return Err(KnowledgeError::MissingRoutes(drug_id.clone()));
            }
            for entry in &drug.routes {
                let positive = entry.factor.is_finite() && entry.factor > 0.0;
                let permitted_zero = entry.factor == 0.0 && is_permitted_zero_factor(drug_id);
                if !positive && !permitted_zero {
                    return Err(KnowledgeError::InvalidFactor {
                        drug_id: drug_id.clone(),
                        route: entry.route.clone(),
                        factor: entry.factor,
                    });
                }
            }
        }

        tracing::info!(
            version = %document.version,
            last_updated = %document.last_updated,
            drugs = document.conversion_factors.len(),
            "knowledge base validated"
        );
        Ok(Self { document })
    }

    pub fn version(&self) -> &str {
        &self.document.version
    }

    pub fn last_updated(&self) -> jiff::civil::Date {
        self.document.last_updated
    }

    pub fn global_warnings(&self) -> &[String] {
        &self.document.global_warnings
    }

    pub fn evidence_definition(&self, grade: &str) -> Option<&str> {
        self.document
            .evidence_quality_definitions
            .get(grade)
            .map(String::as_str)
    }

    pub fn drug_ids(&self) -> impl Iterator<Item = &str> {
        self.document.conversion_factors.keys().map(String::as_str)
    }

    pub fn drug(&self, drug_id: &str) -> Option<&DrugFactors> {
        self.document.conversion_factors.get(drug_id)
    }

    /// Conversion entry for `drug_id` via exactly `route`. A route the table
    /// does not list is a miss; bolus factors never stand in for drips.
    pub fn factor(&self, drug_id: &str, route: &str) -> Option<&ConversionFactor> {
        self.drug(drug_id)?.routes.iter().find(|r| r.route == route)
    }

    pub fn factor_value(&self, drug_id: &str, route: &str) -> Option<f64> {
        self.factor(drug_id, route).map(|f| f.factor)
    }

    pub fn pharmacology(&self, drug_id: &str) -> Option<&PharmacologyProfile> {
        self.document.clinical_pharmacology.as_ref()?.get(drug_id)
    }

    pub fn pharmacology_all(&self) -> BTreeMap<&str, &PharmacologyProfile> {
        self.document
            .clinical_pharmacology
            .iter()
            .flatten()
            .map(|(id, p)| (id.as_str(), p))
            .collect()
    }
}
