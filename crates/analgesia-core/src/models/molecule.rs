use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Closed set of active ingredients the engines reason about.
///
/// Every recommendation carries one of these from the moment it is created,
/// so gates and de-duplication never have to match on display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Molecule {
    Morphine,
    Hydromorphone,
    Oxycodone,
    Hydrocodone,
    Oxymorphone,
    Codeine,
    Fentanyl,
    Sufentanil,
    Alfentanil,
    Remifentanil,
    Methadone,
    Buprenorphine,
    Tramadol,
    Tapentadol,
    Levorphanol,
    Meperidine,
    Ketamine,
    Suzetrigine,
    Naloxone,
    Naltrexone,
    /// Non-drug entries (referrals, continuation of a mixed home regimen).
    Other,
}

impl Molecule {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Morphine => "Morphine",
            Self::Hydromorphone => "Hydromorphone",
            Self::Oxycodone => "Oxycodone",
            Self::Hydrocodone => "Hydrocodone",
            Self::Oxymorphone => "Oxymorphone",
            Self::Codeine => "Codeine",
            Self::Fentanyl => "Fentanyl",
            Self::Sufentanil => "Sufentanil",
            Self::Alfentanil => "Alfentanil",
            Self::Remifentanil => "Remifentanil",
            Self::Methadone => "Methadone",
            Self::Buprenorphine => "Buprenorphine",
            Self::Tramadol => "Tramadol",
            Self::Tapentadol => "Tapentadol",
            Self::Levorphanol => "Levorphanol",
            Self::Meperidine => "Meperidine",
            Self::Ketamine => "Ketamine",
            Self::Suzetrigine => "Suzetrigine",
            Self::Naloxone => "Naloxone",
            Self::Naltrexone => "Naltrexone",
            Self::Other => "Other",
        }
    }

    /// Full or partial mu-opioid agonists, i.e. everything a naltrexone
    /// blockade makes unreliable.
    pub fn is_mu_agonist(&self) -> bool {
        !matches!(
            self,
            Self::Ketamine | Self::Suzetrigine | Self::Naloxone | Self::Naltrexone | Self::Other
        )
    }

    /// Agents displaced from the receptor by buprenorphine's higher affinity.
    pub fn is_low_affinity_agonist(&self) -> bool {
        matches!(
            self,
            Self::Morphine | Self::Oxycodone | Self::Codeine | Self::Hydrocodone | Self::Tramadol
        )
    }

    /// Parent compounds that depend on renal clearance of active metabolites.
    pub fn has_renal_toxic_metabolites(&self) -> bool {
        matches!(self, Self::Morphine | Self::Codeine | Self::Meperidine)
    }

    /// Prodrugs or agents with variable hepatic activation.
    pub fn is_hepatotoxic_choice(&self) -> bool {
        matches!(
            self,
            Self::Morphine
                | Self::Codeine
                | Self::Methadone
                | Self::Oxymorphone
                | Self::Tapentadol
                | Self::Tramadol
                | Self::Meperidine
        )
    }

    /// CYP2D6-activated agents contraindicated in pregnancy, lactation and children.
    pub fn is_ultra_rapid_metabolizer_risk(&self) -> bool {
        matches!(self, Self::Codeine | Self::Tramadol)
    }
}

impl std::fmt::Display for Molecule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Administration route of a single recommendation or adjuvant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AdminRoute {
    Iv,
    Po,
    Sublingual,
    Transdermal,
    Subcutaneous,
    Rectal,
    Topical,
}

impl AdminRoute {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Iv => "IV",
            Self::Po => "PO",
            Self::Sublingual => "SL",
            Self::Transdermal => "Patch",
            Self::Subcutaneous => "SC",
            Self::Rectal => "PR",
            Self::Topical => "Topical",
        }
    }

    /// Requires a functioning gut.
    pub fn is_enteral(&self) -> bool {
        matches!(self, Self::Po)
    }
}
