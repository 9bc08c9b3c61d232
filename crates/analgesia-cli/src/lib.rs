//! analgesia-cli
//!
//! Command-line front end for the clinical engine. JSON in, JSON out; logs
//! go to stderr.

pub mod config;
pub mod input;
