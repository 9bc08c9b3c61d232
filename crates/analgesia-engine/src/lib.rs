//! analgesia-engine
//!
//! Single entry point over the assessment and dosing crates. A
//! [`ClinicalEngine`] holds the validated knowledge base and runs the fixed
//! pipeline: generate, gate, score, advise, validate.

pub mod engine;
pub mod error;
pub mod outcome;

pub use engine::ClinicalEngine;
pub use error::EngineError;
pub use outcome::{AssessmentOutcome, DripReport, PcaReport};
