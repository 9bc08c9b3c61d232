//! analgesia-knowledge
//!
//! The versioned drug reference table: per-drug conversion factors by route,
//! evidence grading, and display pharmacology. A [`DrugKnowledgeBase`] can only
//! be obtained through a validating constructor, so holding one means the
//! factor table has passed its integrity checks.

pub mod error;
pub mod knowledge_base;
pub mod model;

pub use knowledge_base::DrugKnowledgeBase;

/// Drug ids allowed to carry a zero conversion factor: partial agonists and
/// non-opioid analgesics that are reported but excluded from MME totals.
pub const PERMITTED_ZERO_FACTOR: &[&str] =
    &["buprenorphine", "butrans", "sublingual_fentanyl", "suzetrigine"];

/// Whether `drug_id` may legitimately carry a zero factor.
pub fn is_permitted_zero_factor(drug_id: &str) -> bool {
    PERMITTED_ZERO_FACTOR.contains(&drug_id)
}
