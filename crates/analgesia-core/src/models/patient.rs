use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::parse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Sex {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RenalStatus {
    #[default]
    Normal,
    /// eGFR < 60.
    Impaired,
    Dialysis,
}

impl RenalStatus {
    pub fn is_impaired(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum HepaticStatus {
    #[default]
    Normal,
    Impaired,
    /// Child-Pugh C.
    Failure,
}

impl HepaticStatus {
    pub fn is_impaired(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Hemodynamics {
    #[default]
    Stable,
    Unstable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GiStatus {
    #[default]
    Intact,
    /// Enteral tube feeding.
    Tube,
    Npo,
}

/// Route the clinician is planning to use for the opioid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OpioidRoute {
    #[default]
    Both,
    Iv,
    Po,
}

impl OpioidRoute {
    pub fn includes_po(&self) -> bool {
        matches!(self, Self::Both | Self::Po)
    }

    pub fn includes_iv(&self) -> bool {
        matches!(self, Self::Both | Self::Iv)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ClinicalIndication {
    #[default]
    Standard,
    Postoperative,
    Dyspnea,
    Cancer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PainType {
    #[default]
    Nociceptive,
    Neuropathic,
    Inflammatory,
    Bone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InflammatorySubtype {
    #[default]
    None,
    Gout,
    Autoimmune,
    Pericarditis,
}

/// The patient's current relationship with opioids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnalgesicProfile {
    #[default]
    Naive,
    ChronicRx,
    Buprenorphine,
    Methadone,
    HighPotency,
    Naltrexone,
}

impl AnalgesicProfile {
    pub fn is_naive(&self) -> bool {
        matches!(self, Self::Naive)
    }

    /// Opioid-tolerant on a full or partial agonist.
    pub fn is_chronic(&self) -> bool {
        matches!(
            self,
            Self::ChronicRx | Self::Buprenorphine | Self::Methadone | Self::HighPotency
        )
    }

    /// Tolerant on a full agonist home regimen that should be continued.
    pub fn has_home_agonist(&self) -> bool {
        matches!(self, Self::ChronicRx | Self::Methadone | Self::HighPotency)
    }
}

/// Everything the assessment pipeline knows about a patient.
///
/// Numeric fields arrive as strings straight from form inputs; use
/// [`PatientContext::age_years`] and [`PatientContext::current_mme_value`]
/// rather than parsing them ad hoc.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct PatientContext {
    pub age: String,
    pub sex: Sex,
    pub renal: RenalStatus,
    pub hepatic: HepaticStatus,
    pub hemodynamics: Hemodynamics,
    pub pain_type: PainType,
    pub inflammatory_subtype: InflammatorySubtype,
    pub indication: ClinicalIndication,
    pub route: OpioidRoute,
    pub gi: GiStatus,
    pub profile: AnalgesicProfile,

    // Comorbidities
    pub sleep_apnea: bool,
    pub chf: bool,
    pub copd: bool,
    pub benzos: bool,
    pub psych_history: bool,
    pub history_overdose: bool,
    #[serde(alias = "has_gi_bleed", alias = "historyGIBleed")]
    pub history_gi_bleed: bool,
    pub qtc_prolonged: bool,
    pub is_pregnant: bool,
    pub is_breastfeeding: bool,
    pub tolerance_uncertain: bool,
    pub multiple_providers: bool,

    // Hepatic decompensation detail
    /// West Haven grade, 0 (none) to 4.
    pub encephalopathy_grade: u8,
    pub has_ascites: bool,
    pub has_coagulopathy: bool,

    /// Home buprenorphine already divided through the day.
    pub split_dosing: bool,
    /// Enrolled in opioid use disorder treatment.
    pub oud_context: bool,

    pub current_mme: String,
}

impl PatientContext {
    /// Parse and validate a context document at an input boundary.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let ctx: Self = serde_json::from_str(json)?;
        ctx.validate()?;
        Ok(ctx)
    }

    /// Reject values a form could not have produced. Blank numeric fields are fine.
    pub fn validate(&self) -> Result<(), CoreError> {
        parse::validate_age(&self.age)?;
        parse::validate_mme(&self.current_mme)?;
        if self.encephalopathy_grade > 4 {
            return Err(CoreError::OutOfRange {
                field: "encephalopathy_grade".to_string(),
                value: self.encephalopathy_grade.to_string(),
            });
        }
        Ok(())
    }

    pub fn age_years(&self) -> Option<u32> {
        parse::parse_age(&self.age)
    }

    /// Age for threshold rules; unknown age never satisfies an age rule.
    pub fn age_at_least(&self, years: u32) -> bool {
        self.age_years().is_some_and(|a| a >= years)
    }

    /// Unknown age is treated as adult.
    pub fn is_pediatric(&self) -> bool {
        self.age_years().is_some_and(|a| a < 18)
    }

    /// Current MME, zero when blank or unparseable.
    pub fn current_mme_value(&self) -> f64 {
        parse::parse_mme(&self.current_mme).unwrap_or(0.0)
    }

    pub fn has_severe_encephalopathy(&self) -> bool {
        self.encephalopathy_grade >= 3
    }

    /// Hepatic failure with renal impairment.
    pub fn is_hepatorenal(&self) -> bool {
        self.hepatic.is_failure() && self.renal.is_impaired()
    }

    pub fn is_npo(&self) -> bool {
        self.gi == GiStatus::Npo
    }
}
