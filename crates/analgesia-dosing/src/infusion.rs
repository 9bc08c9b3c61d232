//! Patient-controlled analgesia and continuous infusion arithmetic.

use analgesia_core::models::molecule::Molecule;
use analgesia_core::models::patient::PatientContext;
use analgesia_knowledge::DrugKnowledgeBase;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DosingError;

const MONITORING_REQUIRED: &str = "Monitoring Required: Continuous Pulse Oximetry + Capnography (if available). Assess sedation (POSS) frequently. (PRODIGY/CDC).";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InfusionDrug {
    #[default]
    Morphine,
    Hydromorphone,
    Fentanyl,
}

impl InfusionDrug {
    pub fn molecule(&self) -> Molecule {
        match self {
            Self::Morphine => Molecule::Morphine,
            Self::Hydromorphone => Molecule::Hydromorphone,
            Self::Fentanyl => Molecule::Fentanyl,
        }
    }

    fn kb_id(&self) -> &'static str {
        match self {
            Self::Morphine => "morphine",
            Self::Hydromorphone => "hydromorphone",
            Self::Fentanyl => "fentanyl",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Fentanyl => "mcg",
            _ => "mg",
        }
    }
}

/// PCA pump programming. Doses are in the drug's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PcaSettings {
    pub drug: InfusionDrug,
    /// Per mL, in the drug's unit.
    pub concentration: f64,
    pub demand_dose: f64,
    pub lockout_minutes: u32,
    /// Per hour.
    pub basal_rate: f64,
}

impl Default for PcaSettings {
    fn default() -> Self {
        Self {
            drug: InfusionDrug::Morphine,
            concentration: 1.0,
            demand_dose: 1.0,
            lockout_minutes: 10,
            basal_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PcaLimits {
    pub max_doses_per_hour: f64,
    pub one_hour_limit: f64,
    pub four_hour_limit: f64,
}

impl PcaSettings {
    pub fn limits(&self) -> Result<PcaLimits, DosingError> {
        if self.lockout_minutes == 0 {
            return Err(DosingError::InvalidParameter {
                parameter: "lockout interval".to_string(),
                value: 0.0,
            });
        }
        for (parameter, value) in [("demand dose", self.demand_dose), ("basal rate", self.basal_rate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DosingError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value,
                });
            }
        }

        let max_doses_per_hour = 60.0 / f64::from(self.lockout_minutes);
        let one_hour_limit = max_doses_per_hour * self.demand_dose + self.basal_rate;
        Ok(PcaLimits {
            max_doses_per_hour,
            one_hour_limit,
            four_hour_limit: one_hour_limit * 4.0,
        })
    }

    /// Programming warnings for this patient, most severe first.
    pub fn validate(&self, ctx: &PatientContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let naive = ctx.profile.is_naive();
        let age = ctx.age_years();
        let elderly = age.is_some_and(|a| a >= 65);
        let has_basal = self.basal_rate > 0.0;

        if let Some(age) = age.filter(|_| elderly) {
            if self.lockout_minutes < 15 {
                warnings.push(format!(
                    "Geriatric Safety (Age {age}): Recommend extending lockout to ≥15 min due to slower clearance."
                ));
            }
            if has_basal {
                warnings.push("HIGH RISK (Geriatric): Basal infusions in elderly increase delirium/sedation risk. Avoid if possible.".to_string());
            }
        }

        if has_basal {
            if naive {
                warnings.push("SAFETY ALERT: Basal infusions in opioid-naive patients are NOT recommended. No analgesic benefit with increased risk of respiratory depression. (APS/ASA Guidelines).".to_string());
            }
            if ctx.sleep_apnea {
                warnings.push("HIGH RISK: Basal infusion in OSA significantly increases risk of respiratory depression. Continuous monitoring required if basal is strictly necessary. (AASM/ASA).".to_string());
            }
        }

        if naive && self.lockout_minutes < 10 {
            warnings.push("Parameter Check: APS/ASA Guidelines suggest ≥10 minute lockout for opioid-naive patients to prevent stacking.".to_string());
        }
        if self.lockout_minutes < 6 {
            warnings.push("Pharmacokinetic Warning: Lockout < 6 min (< CNS onset). Risk of dose stacking before peak effect.".to_string());
        }

        if ctx.renal.is_impaired() {
            match self.drug {
                InfusionDrug::Morphine => warnings.push("Renal Alert: Morphine is NOT first-line (active M6G metabolites accumulate). Consider Fentanyl or Methadone (requires specialist consultation). (FDA/ASCO).".to_string()),
                InfusionDrug::Hydromorphone => warnings.push("Renal Caution: Hydromorphone metabolites (H3G) accumulate, increasing neurotoxicity risk (agitation/seizures). Titrate carefully.".to_string()),
                InfusionDrug::Fentanyl => {}
            }
        }

        if ctx.sleep_apnea || (naive && has_basal) || ctx.renal.is_impaired() || elderly {
            warnings.push(MONITORING_REQUIRED.to_string());
        }
        warnings
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InfusionDuration {
    /// PRN or bolus dosing under 4 hours.
    Bolus,
    /// Running 24 hours or more.
    #[default]
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DripSettings {
    pub drug: InfusionDrug,
    /// Per mL, in the drug's unit.
    pub concentration: f64,
    /// mL/hr.
    pub rate_ml_hr: f64,
    pub duration: InfusionDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DripSummary {
    pub hourly_dose: f64,
    pub daily_dose: f64,
    pub unit: String,
    pub daily_mme: f64,
    pub factor: f64,
    pub evidence_quality: String,
}

impl DripSettings {
    fn route_key(&self) -> &'static str {
        match (self.drug, self.duration) {
            (InfusionDrug::Fentanyl, InfusionDuration::Continuous) => "iv_continuous",
            _ => "iv",
        }
    }

    pub fn summarize(&self, kb: &DrugKnowledgeBase) -> Result<DripSummary, DosingError> {
        for (parameter, value) in [("concentration", self.concentration), ("rate", self.rate_ml_hr)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DosingError::InvalidParameter {
                    parameter: parameter.to_string(),
                    value,
                });
            }
        }
        let route = self.route_key();
        let factor = kb
            .factor(self.drug.kb_id(), route)
            .ok_or_else(|| DosingError::UnknownRoute {
                drug_id: self.drug.kb_id().to_string(),
                route: route.to_string(),
            })?;

        let hourly_dose = self.rate_ml_hr * self.concentration;
        let daily_dose = hourly_dose * 24.0;
        Ok(DripSummary {
            hourly_dose,
            daily_dose,
            unit: self.drug.unit().to_string(),
            daily_mme: daily_dose * factor.factor,
            factor: factor.factor,
            evidence_quality: factor.evidence_quality.clone(),
        })
    }

    /// Physiologic sensitivity multiplier. MME stays fixed for reporting;
    /// this expresses how much harder the same MME hits this patient.
    pub fn risk_multiplier(&self, ctx: &PatientContext) -> f64 {
        let mut multiplier = 1.0;
        if ctx.age_at_least(65) {
            multiplier *= 1.25;
        }
        if ctx.age_at_least(80) {
            multiplier *= 1.5;
        }
        if ctx.sleep_apnea {
            multiplier *= 1.5;
        }
        if ctx.renal.is_impaired() && self.drug == InfusionDrug::Morphine {
            multiplier *= 2.0;
        }
        multiplier
    }

    pub fn validate(&self, ctx: &PatientContext) -> Vec<String> {
        let mut warnings = Vec::new();
        let running = self.rate_ml_hr > 0.0;
        let elderly = ctx.age_at_least(65);

        if let Some(age) = ctx.age_years().filter(|_| elderly) {
            warnings.push(format!(
                "Geriatric Context (Age {age}): Consider 25-50% rate reduction due to decreased clearance and increased sensitivity."
            ));
        }
        if ctx.renal.is_impaired() && self.drug == InfusionDrug::Morphine {
            warnings.push("Renal Alert: Morphine drips accumulate active metabolites. Fentanyl is preferred in renal failure.".to_string());
        }
        if ctx.sleep_apnea && running {
            warnings.push("OSA Warning: Continuous infusions in OSA require extreme caution and continuous monitoring. (AASM).".to_string());
        }
        if ctx.sleep_apnea || (ctx.profile.is_naive() && running) || ctx.renal.is_impaired() || elderly {
            warnings.push(MONITORING_REQUIRED.to_string());
        }
        if self.drug == InfusionDrug::Fentanyl {
            warnings.push(match self.duration {
                InfusionDuration::Continuous => "Continuous Infusion: Using steady-state conversion ratio (0.12 MME/mcg). Acute bolus ratio is 0.3 MME/mcg.".to_string(),
                InfusionDuration::Bolus => "Bolus/PRN Dosing: Using acute conversion ratio (0.3 MME/mcg). If transitioning to continuous infusion, recalculate using steady-state ratio.".to_string(),
            });
        }
        warnings
    }
}
