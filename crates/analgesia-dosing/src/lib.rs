//! analgesia-dosing
//!
//! Dose arithmetic: MME aggregation and back-conversion to target drugs,
//! clinically load-bearing rounding, PCA and continuous-infusion limits, and
//! the nonlinear methadone conversion. Pure functions over an injected
//! [`DrugKnowledgeBase`](analgesia_knowledge::DrugKnowledgeBase).

pub mod conversion;
pub mod error;
pub mod infusion;
pub mod methadone;
pub mod rounding;
