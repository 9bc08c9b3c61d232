//! Route-aware dose rounding.
//!
//! These rules are part of the clinical contract: a transdermal dose that is
//! rounded up stays on the skin for 72 hours.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Manufactured fentanyl patch strengths, mcg/hr.
pub const PATCH_SIZES_MCG_HR: [u32; 5] = [12, 25, 50, 75, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RoundingStrategy {
    /// IV push, infusion, subcutaneous and microgram doses: one decimal place.
    Parenteral,
    /// Nearest 0.5 below 10 units, nearest whole unit from 10 up.
    Oral,
    /// Down to the nearest manufactured patch strength, never up.
    Patch,
}

pub fn round_oral(value: f64) -> f64 {
    if value < 10.0 {
        (value * 2.0).round() / 2.0
    } else {
        value.round()
    }
}

/// Largest manufactured strength, mcg/hr.
pub const LARGEST_PATCH_MCG_HR: u32 = PATCH_SIZES_MCG_HR[PATCH_SIZES_MCG_HR.len() - 1];

/// Largest manufactured patch strength that does not exceed `mcg_hr`.
///
/// Below the smallest strength there is no safe patch. Above the largest,
/// the result stays at the largest strength.
pub fn round_patch_down(mcg_hr: f64) -> Option<u32> {
    if !mcg_hr.is_finite() {
        return None;
    }
    PATCH_SIZES_MCG_HR
        .iter()
        .rev()
        .copied()
        .find(|size| f64::from(*size) <= mcg_hr)
}

/// Trim a trailing ".0" from a one-decimal rendering.
fn trim_whole(value: f64) -> String {
    let text = format!("{value:.1}");
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// Render `value` with the unit appended, using the route's rounding rule.
pub fn format_dose(value: f64, unit: &str, strategy: RoundingStrategy) -> String {
    match strategy {
        RoundingStrategy::Parenteral => format!("{value:.1} {unit}"),
        RoundingStrategy::Oral => format!("{} {unit}", trim_whole(round_oral(value))),
        RoundingStrategy::Patch => match round_patch_down(value) {
            Some(size) => format!("{size} {unit}"),
            None => "N/A".to_string(),
        },
    }
}

/// Methadone-style rounding to the nearest half unit.
pub fn round_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

/// Down to the next half unit; used where a ceiling has already set the dose.
pub fn round_half_down(value: f64) -> f64 {
    (value * 2.0).floor() / 2.0
}
