//! Request documents read by the subcommands.

use std::io::Read;
use std::path::Path;

use analgesia_core::models::patient::PatientContext;
use analgesia_dosing::conversion::DoseEntry;
use analgesia_dosing::infusion::{DripSettings, PcaSettings};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MmeInput {
    pub entries: Vec<DoseEntry>,
    #[serde(default)]
    pub context: PatientContext,
    /// Overrides the configured cross-tolerance reduction.
    #[serde(default)]
    pub reduction_percent: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PcaInput {
    #[serde(default)]
    pub settings: PcaSettings,
    #[serde(default)]
    pub context: PatientContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DripInput {
    pub settings: DripSettings,
    #[serde(default)]
    pub context: PatientContext,
}

/// Read a whole document from `path`, or from stdin for `None` or `-`.
pub fn read_document(path: Option<&Path>) -> eyre::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse a document and reject contexts a form could not have produced.
pub fn parse_mme(json: &str) -> eyre::Result<MmeInput> {
    let input: MmeInput = serde_json::from_str(json)?;
    input.context.validate()?;
    Ok(input)
}

pub fn parse_pca(json: &str) -> eyre::Result<PcaInput> {
    let input: PcaInput = serde_json::from_str(json)?;
    input.context.validate()?;
    Ok(input)
}

pub fn parse_drip(json: &str) -> eyre::Result<DripInput> {
    let input: DripInput = serde_json::from_str(json)?;
    input.context.validate()?;
    Ok(input)
}
