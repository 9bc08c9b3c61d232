//! Morphine-milligram-equivalent aggregation and equianalgesic back-conversion.

use std::sync::Arc;

use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{
    AnalgesicProfile, GiStatus, HepaticStatus, PatientContext, RenalStatus,
};
use analgesia_knowledge::DrugKnowledgeBase;
use analgesia_knowledge::model::ConversionFactor;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DosingError;
use crate::rounding::{LARGEST_PATCH_MCG_HR, RoundingStrategy, format_dose, round_patch_down};

/// Cross-tolerance reduction applied when the caller does not choose one.
pub const DEFAULT_REDUCTION_PERCENT: f64 = 30.0;

/// Fentanyl patch strength per daily MME when converting TO a patch. The
/// knowledge-base patch factor (2.4) only applies in the other direction.
pub const PATCH_MCG_HR_PER_MME: f64 = 0.5;

/// One active opioid as entered by the clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DoseEntry {
    pub drug_id: String,
    /// Knowledge-base route key, e.g. "po", "iv", "transdermal".
    pub route: String,
    /// Daily amount in the route's unit (mg, mcg, or mcg/hr for patches).
    pub dose: f64,
}

impl DoseEntry {
    pub fn new(drug_id: &str, route: &str, dose: f64) -> Self {
        Self {
            drug_id: drug_id.to_string(),
            route: route.to_string(),
            dose,
        }
    }
}

/// The slice of patient state dose conversion depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ConversionContext {
    pub renal: RenalStatus,
    pub hepatic: HepaticStatus,
    pub gi: GiStatus,
    pub age: Option<u32>,
    pub profile: AnalgesicProfile,
    pub is_pregnant: bool,
    pub benzos: bool,
    pub history_overdose: bool,
    pub sleep_apnea: bool,
}

impl From<&PatientContext> for ConversionContext {
    fn from(ctx: &PatientContext) -> Self {
        Self {
            renal: ctx.renal,
            hepatic: ctx.hepatic,
            gi: ctx.gi,
            age: ctx.age_years(),
            profile: ctx.profile,
            is_pregnant: ctx.is_pregnant,
            benzos: ctx.benzos,
            history_overdose: ctx.history_overdose,
            sleep_apnea: ctx.sleep_apnea,
        }
    }
}

/// What happened to a single entry during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum EntryOutcome {
    Counted {
        drug_id: String,
        route: String,
        dose: f64,
        factor: f64,
        mme: f64,
        /// Input sanity checks for this entry (unit slips, implausible doses).
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        checks: Vec<String>,
    },
    /// Allow-listed zero-factor agent: reported, not summed.
    Excluded {
        drug_id: String,
        route: String,
        dose: f64,
    },
    /// Lookup or input failure confined to this entry.
    Unresolved {
        drug_id: String,
        route: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MmeSummary {
    pub total_mme: f64,
    /// "%.1f" of the total, or "---" when only excluded agents were entered.
    pub display: String,
    pub entries: Vec<EntryOutcome>,
    pub excluded: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComplianceLevel {
    Aggressive,
    Standard,
    Conservative,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RotationCompliance {
    pub level: ComplianceLevel,
    pub message: String,
}

impl RotationCompliance {
    pub fn for_reduction(percent: f64) -> Self {
        if percent < 25.0 {
            Self {
                level: ComplianceLevel::Aggressive,
                message: "Aggressive Rotation (<25%): Reserve for uncontrolled pain with close monitoring.".to_string(),
            }
        } else if percent <= 50.0 {
            Self {
                level: ComplianceLevel::Standard,
                message: "Standard Rotation (25-50%): Guideline-concordant reduction for incomplete cross-tolerance.".to_string(),
            }
        } else {
            Self {
                level: ComplianceLevel::Conservative,
                message: "Conservative Rotation (>50%): Suited to elderly, frail, or organ-impaired patients. Expect breakthrough pain.".to_string(),
            }
        }
    }
}

/// One equianalgesic target, already rounded for its route.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TargetDose {
    pub drug: String,
    pub molecule: Molecule,
    pub route: AdminRoute,
    /// "PO", "PO Liquid", "IV" or "Patch".
    pub formulation: String,
    pub ratio_label: String,
    /// Rounded daily amount with unit, or "AVOID" / "CONSULT" / "N/A".
    pub total_daily: String,
    pub rounding: RoundingStrategy,
    pub adjustments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TargetDoseReport {
    pub total_mme: f64,
    pub reduction_percent: f64,
    pub reduced_mme: f64,
    pub compliance: RotationCompliance,
    pub targets: Vec<TargetDose>,
    /// Set when no targets may be offered at all.
    pub blocked: Option<String>,
    pub warnings: Vec<String>,
}

struct TargetSpec {
    drug: &'static str,
    molecule: Molecule,
    kb_id: &'static str,
    kb_route: &'static str,
    route: AdminRoute,
    unit: &'static str,
    strategy: RoundingStrategy,
}

const TARGETS: [TargetSpec; 7] = [
    TargetSpec {
        drug: "Oxycodone",
        molecule: Molecule::Oxycodone,
        kb_id: "oxycodone",
        kb_route: "po",
        route: AdminRoute::Po,
        unit: "mg",
        strategy: RoundingStrategy::Oral,
    },
    TargetSpec {
        drug: "Hydromorphone",
        molecule: Molecule::Hydromorphone,
        kb_id: "hydromorphone",
        kb_route: "po",
        route: AdminRoute::Po,
        unit: "mg",
        strategy: RoundingStrategy::Oral,
    },
    TargetSpec {
        drug: "Morphine",
        molecule: Molecule::Morphine,
        kb_id: "morphine",
        kb_route: "po",
        route: AdminRoute::Po,
        unit: "mg",
        strategy: RoundingStrategy::Oral,
    },
    TargetSpec {
        drug: "Morphine",
        molecule: Molecule::Morphine,
        kb_id: "morphine",
        kb_route: "iv",
        route: AdminRoute::Iv,
        unit: "mg",
        strategy: RoundingStrategy::Parenteral,
    },
    TargetSpec {
        drug: "Hydromorphone",
        molecule: Molecule::Hydromorphone,
        kb_id: "hydromorphone",
        kb_route: "iv",
        route: AdminRoute::Iv,
        unit: "mg",
        strategy: RoundingStrategy::Parenteral,
    },
    TargetSpec {
        drug: "Fentanyl",
        molecule: Molecule::Fentanyl,
        kb_id: "fentanyl",
        kb_route: "iv",
        route: AdminRoute::Iv,
        unit: "mcg",
        strategy: RoundingStrategy::Parenteral,
    },
    TargetSpec {
        drug: "Fentanyl",
        molecule: Molecule::Fentanyl,
        kb_id: "fentanyl_patch",
        kb_route: "transdermal",
        route: AdminRoute::Transdermal,
        unit: "mcg/hr",
        strategy: RoundingStrategy::Patch,
    },
];

/// Converts between individual opioid doses and total MME.
#[derive(Debug, Clone)]
pub struct DoseConversionEngine {
    kb: Arc<DrugKnowledgeBase>,
}

impl DoseConversionEngine {
    pub fn new(kb: Arc<DrugKnowledgeBase>) -> Self {
        Self { kb }
    }

    /// MME contribution of a single entry.
    pub fn entry_mme(&self, entry: &DoseEntry) -> Result<f64, DosingError> {
        Ok(entry.dose * self.resolve(entry)?.factor)
    }

    /// The knowledge-base entry an input converts through.
    fn resolve(&self, entry: &DoseEntry) -> Result<&ConversionFactor, DosingError> {
        if !entry.dose.is_finite() || entry.dose < 0.0 {
            return Err(DosingError::InvalidDose {
                drug_id: entry.drug_id.clone(),
                value: entry.dose,
            });
        }
        if self.kb.drug(&entry.drug_id).is_none() {
            return Err(DosingError::UnknownDrug(entry.drug_id.clone()));
        }
        self.kb
            .factor(&entry.drug_id, &entry.route)
            .ok_or_else(|| DosingError::UnknownRoute {
                drug_id: entry.drug_id.clone(),
                route: entry.route.clone(),
            })
    }

    /// Sum every resolvable entry. A bad entry is reported and skipped; it
    /// never zeroes or aborts the rest of the total.
    pub fn aggregate(&self, entries: &[DoseEntry], ctx: &ConversionContext) -> MmeSummary {
        let mut outcomes = Vec::with_capacity(entries.len());
        let mut excluded = Vec::new();
        let mut warnings = Vec::new();
        let mut total = 0.0;
        let mut counted = 0usize;

        for entry in entries {
            if entry.drug_id == "methadone" && ctx.is_pregnant {
                let reason = DosingError::Blocked(
                    "methadone conversion in pregnancy requires Maternal-Fetal Medicine".to_string(),
                )
                .to_string();
                tracing::warn!(drug_id = %entry.drug_id, "entry blocked in pregnancy");
                push_unique(
                    &mut warnings,
                    "PREGNANCY: Methadone excluded from MME total. Consult Maternal-Fetal Medicine and Addiction Medicine.",
                );
                outcomes.push(EntryOutcome::Unresolved {
                    drug_id: entry.drug_id.clone(),
                    route: entry.route.clone(),
                    reason,
                });
                continue;
            }

            let conversion = match self.resolve(entry) {
                Ok(conversion) => conversion,
                Err(e) => {
                    tracing::warn!(drug_id = %entry.drug_id, route = %entry.route, error = %e, "unresolved MME entry");
                    outcomes.push(EntryOutcome::Unresolved {
                        drug_id: entry.drug_id.clone(),
                        route: entry.route.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let factor = conversion.factor;
            let mme = entry.dose * factor;
            if factor == 0.0 {
                let name = self
                    .kb
                    .pharmacology(&entry.drug_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| entry.drug_id.clone());
                if !excluded.contains(&name) {
                    excluded.push(name);
                }
                outcomes.push(EntryOutcome::Excluded {
                    drug_id: entry.drug_id.clone(),
                    route: entry.route.clone(),
                    dose: entry.dose,
                });
                continue;
            }

            if let Some(drug) = self.kb.drug(&entry.drug_id) {
                if drug.renal_unsafe && ctx.renal.is_impaired() {
                    push_unique(
                        &mut warnings,
                        &format!("Renal: {} has active metabolites that accumulate. Rotate off if possible.", entry.drug_id),
                    );
                }
                if drug.hepatic_unsafe && ctx.hepatic.is_failure() {
                    push_unique(
                        &mut warnings,
                        &format!("Hepatic Failure: {} metabolism is unreliable. Rotate off if possible.", entry.drug_id),
                    );
                }
            }

            if entry.drug_id == "methadone" {
                push_unique(
                    &mut warnings,
                    "METHADONE DETECTED: The 4.7:1 factor is for MME surveillance only. Do NOT use this total to convert FROM methadone.",
                );
                push_unique(
                    &mut warnings,
                    "Use the methadone conversion tool for switching TO methadone; converting FROM methadone requires specialist consultation.",
                );
            }

            let checks = entry_checks(entry, &conversion.unit);
            if !checks.is_empty() {
                tracing::warn!(drug_id = %entry.drug_id, route = %entry.route, checks = checks.len(), "entry failed input checks");
            }

            total += mme;
            counted += 1;
            outcomes.push(EntryOutcome::Counted {
                drug_id: entry.drug_id.clone(),
                route: entry.route.clone(),
                dose: entry.dose,
                factor,
                mme,
                checks,
            });
        }

        if total > 90.0 {
            warnings.push(">90 MME: High Overdose Risk. Naloxone indicated.".to_string());
        }
        if total > 50.0 || (counted > 0 && (ctx.benzos || ctx.history_overdose || ctx.sleep_apnea)) {
            warnings.push(
                "Naloxone: Co-prescribe rescue kit (>50 MME, benzodiazepines, overdose history, or sleep apnea)."
                    .to_string(),
            );
        }
        if !excluded.is_empty() {
            warnings.push(format!(
                "Excluded from MME: {}. Partial agonists and transmucosal fentanyl are not convertible.",
                excluded.join(", ")
            ));
        }

        let display = if counted == 0 && !excluded.is_empty() {
            "---".to_string()
        } else {
            format!("{total:.1}")
        };

        tracing::debug!(entries = entries.len(), counted, total_mme = total, "MME aggregated");
        MmeSummary {
            total_mme: total,
            display,
            entries: outcomes,
            excluded,
            warnings,
        }
    }

    /// Back-convert `total_mme` into equianalgesic doses of each target drug.
    pub fn target_doses(
        &self,
        total_mme: f64,
        reduction_percent: f64,
        ctx: &ConversionContext,
    ) -> Result<TargetDoseReport, DosingError> {
        if !total_mme.is_finite() || total_mme < 0.0 {
            return Err(DosingError::InvalidParameter {
                parameter: "total MME".to_string(),
                value: total_mme,
            });
        }
        if !(0.0..100.0).contains(&reduction_percent) {
            return Err(DosingError::InvalidParameter {
                parameter: "cross-tolerance reduction".to_string(),
                value: reduction_percent,
            });
        }

        let reduced_mme = total_mme * (1.0 - reduction_percent / 100.0);
        let mut report = TargetDoseReport {
            total_mme,
            reduction_percent,
            reduced_mme,
            compliance: RotationCompliance::for_reduction(reduction_percent),
            targets: Vec::new(),
            blocked: None,
            warnings: Vec::new(),
        };

        if ctx.age.is_some_and(|a| a < 18) {
            report.blocked =
                Some("Pediatric Dosing Not Validated. Please use weight-based formulary.".to_string());
            return Ok(report);
        }
        if ctx.profile == AnalgesicProfile::Naltrexone {
            report.blocked = Some(
                "Naltrexone Blockade: Opioid conversion not applicable. Use non-opioid and regional strategies."
                    .to_string(),
            );
            return Ok(report);
        }

        for target in &TARGETS {
            let Some(factor) = self.kb.factor_value(target.kb_id, target.kb_route) else {
                tracing::warn!(drug_id = target.kb_id, route = target.kb_route, "target missing from knowledge base");
                continue;
            };
            if factor <= 0.0 {
                continue;
            }
            report.targets.push(build_target(target, factor, reduced_mme, ctx));
        }

        order_for_gi(&mut report.targets, ctx.gi);

        if ctx.hepatic.is_failure() {
            report
                .warnings
                .push("Hepatic Failure: Fentanyl preferred. Other targets reduced 50%.".to_string());
        }
        if ctx.renal == RenalStatus::Dialysis {
            report
                .warnings
                .push("Dialysis: Morphine contraindicated. Fentanyl preferred.".to_string());
        }
        Ok(report)
    }
}

fn build_target(target: &TargetSpec, factor: f64, reduced_mme: f64, ctx: &ConversionContext) -> TargetDose {
    let mut multiplier = 1.0;
    let mut adjustments = Vec::new();
    let mut override_text: Option<&str> = None;

    match target.molecule {
        Molecule::Hydromorphone => match ctx.renal {
            RenalStatus::Impaired => adjustments.push("Renal Caution (monitor H3G)".to_string()),
            RenalStatus::Dialysis => {
                multiplier *= 0.5;
                adjustments.push("Renal: -50%".to_string());
            }
            RenalStatus::Normal => {}
        },
        Molecule::Morphine => match ctx.renal {
            RenalStatus::Impaired => adjustments.push("Renal: Consider -25%".to_string()),
            RenalStatus::Dialysis => {
                override_text = Some("AVOID");
                adjustments.push("CONTRAINDICATED (Neurotoxic Metabolites)".to_string());
            }
            RenalStatus::Normal => {}
        },
        _ => {}
    }

    if ctx.hepatic.is_failure() && target.molecule != Molecule::Fentanyl {
        if target.molecule == Molecule::Hydromorphone && target.route == AdminRoute::Po {
            override_text.get_or_insert("CONSULT");
            adjustments.push("CONTRAINDICATED (Hepatic Shunting Risk)".to_string());
        } else {
            multiplier *= 0.5;
            adjustments.push("Hepatic: -50% (Clearance)".to_string());
        }
    }

    let raw = match target.strategy {
        RoundingStrategy::Patch => reduced_mme * PATCH_MCG_HR_PER_MME * multiplier,
        _ => reduced_mme / factor * multiplier,
    };
    let (ratio_label, total_daily) = match target.strategy {
        RoundingStrategy::Patch => match round_patch_down(raw) {
            Some(size) => {
                if f64::from(size) < raw && size == LARGEST_PATCH_MCG_HR {
                    adjustments.push(
                        "Exceeds largest patch strength: combine patches only with Pain Service input".to_string(),
                    );
                }
                (
                    format!("Rounded DOWN from {raw:.1} mcg/hr"),
                    format_dose(raw, target.unit, target.strategy),
                )
            }
            None => ("(Too low for patch)".to_string(), "N/A".to_string()),
        },
        _ => {
            let label = if target.molecule == Molecule::Fentanyl {
                "10mg Mor IV : 100mcg Fent".to_string()
            } else if target.route == AdminRoute::Iv {
                format!("IV Ratio {}:1", trim_factor(factor))
            } else {
                format!("{} : 1", trim_factor(factor))
            };
            (label, format_dose(raw, target.unit, target.strategy))
        }
    };

    let formulation = match (target.route, ctx.gi) {
        (AdminRoute::Po, GiStatus::Tube) => "PO Liquid",
        (route, _) => route.label(),
    };

    TargetDose {
        drug: target.drug.to_string(),
        molecule: target.molecule,
        route: target.route,
        formulation: formulation.to_string(),
        ratio_label,
        total_daily: override_text.map(str::to_string).unwrap_or(total_daily),
        rounding: target.strategy,
        adjustments,
    }
}

/// Unit-slip and implausible-dose checks for one counted entry.
fn entry_checks(entry: &DoseEntry, unit: &str) -> Vec<String> {
    let mut checks = Vec::new();
    let dose = entry.dose;
    if dose <= 0.0 {
        return checks;
    }

    if matches!(entry.drug_id.as_str(), "sufentanil" | "alfentanil") && dose < 1.0 {
        checks.push("CRITICAL: Dose <1 mcg. Verify against a decimal error.".to_string());
    } else if unit.starts_with("mcg") && dose < 10.0 {
        checks.push("Suspected Unit Error: Input <10. Verify MICROGRAMS (mcg), not mg.".to_string());
    }

    let ceiling = match (entry.drug_id.as_str(), entry.route.as_str()) {
        ("hydromorphone", "iv") => Some((4.0, "mg")),
        ("morphine", "iv") => Some((20.0, "mg")),
        ("fentanyl", "iv") => Some((200.0, "mcg")),
        ("oxycodone", "po") => Some((120.0, "mg")),
        _ => None,
    };
    if let Some((limit, limit_unit)) = ceiling.filter(|(limit, _)| dose > *limit) {
        checks.push(format!("Unusually high single dose (>{limit}{limit_unit}). Verify."));
    }
    checks
}

/// Stable sort: oral first when the gut works, parenteral first when NPO.
fn order_for_gi(targets: &mut [TargetDose], gi: GiStatus) {
    let rank = |t: &TargetDose| -> u8 {
        match (gi, t.route) {
            (GiStatus::Npo, AdminRoute::Iv) => 0,
            (GiStatus::Npo, AdminRoute::Transdermal) => 1,
            (GiStatus::Npo, _) => 2,
            (_, AdminRoute::Po) => 0,
            (_, AdminRoute::Iv) => 1,
            _ => 2,
        }
    };
    targets.sort_by_key(rank);
}

fn trim_factor(factor: f64) -> String {
    if factor.fract() == 0.0 {
        format!("{factor:.0}")
    } else {
        format!("{factor}")
    }
}

fn push_unique(list: &mut Vec<String>, message: &str) {
    if !list.iter().any(|m| m == message) {
        list.push(message.to_string());
    }
}
