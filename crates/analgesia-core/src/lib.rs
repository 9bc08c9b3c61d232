//! analgesia-core
//!
//! Pure domain types shared by every analgesia crate: the patient context,
//! the closed molecule vocabulary, and the recommendation/audit records the
//! engines emit. No I/O and no reference data live here.

pub mod error;
pub mod models;
pub mod parse;
