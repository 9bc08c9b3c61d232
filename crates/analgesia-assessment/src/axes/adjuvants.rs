use analgesia_core::models::molecule::AdminRoute;
use analgesia_core::models::patient::{
    GiStatus, HepaticStatus, InflammatorySubtype, PainType, PatientContext, RenalStatus,
};

use crate::Axis;
use crate::accumulator::Accumulator;

/// Non-opioid co-analgesics for the pain phenotype.
pub struct Adjuvants;

impl Axis for Adjuvants {
    fn name(&self) -> &str {
        "adjuvants"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        match ctx.pain_type {
            PainType::Nociceptive => {}
            PainType::Neuropathic => neuropathic(ctx, acc),
            PainType::Inflammatory => {
                nsaid_warnings(ctx, acc);
                match ctx.inflammatory_subtype {
                    InflammatorySubtype::Gout => gout(ctx, acc),
                    InflammatorySubtype::Pericarditis => pericarditis(ctx, acc),
                    InflammatorySubtype::None | InflammatorySubtype::Autoimmune => nsaids(ctx, acc),
                }
            }
            PainType::Bone => {
                nsaid_warnings(ctx, acc);
                nsaids(ctx, acc);
                acc.adjuvant(
                    "Steroid",
                    "Dexamethasone",
                    "4-8mg IV/PO daily",
                    "Reduces periosteal and capsular bone pain.",
                    AdminRoute::Iv,
                );
            }
        }

        acetaminophen(ctx, acc);

        if ctx.is_npo() {
            acc.retain_adjuvants(|a| !a.route.is_enteral());
        }
    }
}

/// Systemic NSAIDs need intact kidneys, liver, heart and gut, and no pregnancy.
fn nsaid_ok(ctx: &PatientContext) -> bool {
    !ctx.renal.is_impaired()
        && !ctx.hepatic.is_impaired()
        && !ctx.chf
        && ctx.gi == GiStatus::Intact
        && !ctx.history_gi_bleed
        && !ctx.is_pregnant
}

fn neuropathic(ctx: &PatientContext, acc: &mut Accumulator) {
    acc.warn("Neuropathic Pain: Opioids are 3rd-line (High risk/Low efficacy). Prioritize Gabapentinoids, SNRIs, TCAs.");

    let (dose, rationale) = match ctx.renal {
        RenalStatus::Dialysis => ("100mg PO Post-HD", "Dialyzable. Dose after each session."),
        RenalStatus::Impaired => ("100-300mg PO QHS (Renal Dose)", "Accumulates in CKD. Start low."),
        RenalStatus::Normal => ("300mg PO TID", "First-line. Titrate to effect."),
    };
    acc.adjuvant("Gabapentinoid", "Gabapentin", dose, rationale, AdminRoute::Po);

    if !ctx.hepatic.is_impaired() && ctx.renal != RenalStatus::Dialysis && !ctx.age_at_least(80) {
        acc.adjuvant(
            "SNRI",
            "Duloxetine",
            "30mg PO daily",
            "First-line SNRI. Avoid if eGFR < 30.",
            AdminRoute::Po,
        );
    }

    let elderly = ctx.age_at_least(65);
    if !ctx.chf && !elderly {
        acc.adjuvant(
            "TCA",
            "Nortriptyline",
            "10-25mg PO QHS",
            "First-line TCA. Monitor QTc and anticholinergic effects.",
            AdminRoute::Po,
        );
    } else if elderly {
        acc.warn("Avoid TCAs in Elderly (Beers Criteria): Anticholinergic and fall risk.");
    }

    acc.adjuvant(
        "Topical",
        "Lidocaine 5% Patch",
        "Apply 12h ON / 12h OFF",
        "Peripheral analgesia without systemic exposure.",
        AdminRoute::Topical,
    );
    acc.adjuvant(
        "Topical",
        "Capsaicin 8% Patch",
        "Apply to affected area",
        "High-concentration topical for localized neuropathy.",
        AdminRoute::Topical,
    );
}

fn nsaid_warnings(ctx: &PatientContext, acc: &mut Accumulator) {
    if ctx.history_gi_bleed {
        acc.warn("GI BLEED History: Systemic NSAIDs contraindicated. Use topical agents.");
        acc.adjuvant(
            "Topical",
            "Diclofenac Gel 1%",
            "4g QID to affected area",
            "Minimal systemic absorption.",
            AdminRoute::Topical,
        );
    }
    if ctx.is_pregnant {
        acc.warn("NSAIDs: Avoid in pregnancy (Fetal Ductus Arteriosus closure, oligohydramnios).");
    }
    if ctx.chf {
        acc.warn("CHF: Avoid NSAIDs (Fluid retention and heart failure exacerbation).");
    }
}

fn nsaids(ctx: &PatientContext, acc: &mut Accumulator) {
    let organs_ok = !ctx.renal.is_impaired()
        && !ctx.hepatic.is_impaired()
        && !ctx.chf
        && !ctx.history_gi_bleed
        && !ctx.is_pregnant;

    if ctx.is_npo() && organs_ok {
        acc.adjuvant(
            "NSAID",
            "Ketorolac",
            "15mg IV q6h (Max 5 days)",
            "Parenteral NSAID while NPO.",
            AdminRoute::Iv,
        );
    } else if nsaid_ok(ctx) {
        if ctx.age_at_least(65) {
            acc.adjuvant(
                "Topical",
                "Diclofenac Gel 1%",
                "4g QID to affected area",
                "Topical NSAID preferred in elderly (Beers Criteria).",
                AdminRoute::Topical,
            );
            acc.adjuvant(
                "NSAID",
                "Celecoxib",
                "100-200mg PO BID",
                "COX-2 selective. Add GI protection.",
                AdminRoute::Po,
            );
        } else {
            acc.adjuvant(
                "NSAID",
                "Naproxen",
                "500mg PO BID",
                "Non-selective NSAID. Take with food.",
                AdminRoute::Po,
            );
            acc.adjuvant(
                "NSAID",
                "Ibuprofen",
                "400-600mg PO QID",
                "First-line anti-inflammatory.",
                AdminRoute::Po,
            );
        }
    } else {
        acc.warn("Avoid NSAIDs: Contraindicated due to Renal/Hepatic/GI/CHF risk.");
    }
}

fn gout(ctx: &PatientContext, acc: &mut Accumulator) {
    let prednisone = |acc: &mut Accumulator| {
        acc.adjuvant(
            "Steroid",
            "Prednisone",
            "30-40mg PO daily x 5 days",
            "Flare control when colchicine and NSAIDs are unsafe.",
            AdminRoute::Po,
        );
    };
    let anakinra = |acc: &mut Accumulator| {
        acc.adjuvant(
            "Biologic",
            "Anakinra",
            "100mg SC daily x 3 days",
            "IL-1 blockade. No hepatic or renal dose limit for short courses.",
            AdminRoute::Subcutaneous,
        );
    };

    if ctx.hepatic == HepaticStatus::Failure {
        acc.warn("COMPLEX GOUT: Colchicine contraindicated in hepatic failure. Use IL-1 blockade.");
        anakinra(acc);
    } else if ctx.renal.is_impaired() && ctx.hepatic.is_impaired() {
        acc.warn("COMPLEX GOUT: Combined renal and hepatic impairment. Avoid colchicine and NSAIDs.");
        anakinra(acc);
        prednisone(acc);
    } else if ctx.renal == RenalStatus::Dialysis {
        acc.warn("RENAL GOUT: Colchicine and NSAIDs contraindicated in dialysis. Use corticosteroids.");
        prednisone(acc);
    } else if ctx.renal.is_impaired() {
        acc.adjuvant(
            "Anti-inflammatory",
            "Colchicine",
            "0.3mg PO daily (Renal Dose)",
            "Reduced dose for eGFR < 60.",
            AdminRoute::Po,
        );
        prednisone(acc);
    } else if nsaid_ok(ctx) {
        acc.adjuvant(
            "Anti-inflammatory",
            "Colchicine",
            "1.2mg PO, then 0.6mg in 1 hour",
            "Low-dose flare regimen.",
            AdminRoute::Po,
        );
        acc.adjuvant(
            "NSAID",
            "Indomethacin",
            "50mg PO TID",
            "Acute flare anti-inflammatory.",
            AdminRoute::Po,
        );
    } else {
        acc.adjuvant(
            "Anti-inflammatory",
            "Colchicine",
            "1.2mg PO, then 0.6mg in 1 hour",
            "Low-dose flare regimen.",
            AdminRoute::Po,
        );
        prednisone(acc);
    }

    if ctx.is_breastfeeding {
        acc.warn("LACTATION: Colchicine passes into breast milk. Monitor infant for GI upset.");
    }
}

fn pericarditis(ctx: &PatientContext, acc: &mut Accumulator) {
    if nsaid_ok(ctx) {
        acc.adjuvant(
            "NSAID",
            "Ibuprofen",
            "600mg PO TID",
            "High-dose NSAID for pericardial inflammation.",
            AdminRoute::Po,
        );
        acc.adjuvant(
            "Anti-inflammatory",
            "Colchicine",
            "0.5mg PO BID",
            "Reduces recurrence.",
            AdminRoute::Po,
        );
        return;
    }

    acc.adjuvant(
        "Steroid",
        "Prednisone",
        "0.2-0.5mg/kg PO daily",
        "NSAIDs contraindicated. Taper slowly.",
        AdminRoute::Po,
    );
    if !ctx.is_pregnant && ctx.renal != RenalStatus::Dialysis && !ctx.hepatic.is_failure() {
        acc.adjuvant(
            "Anti-inflammatory",
            "Colchicine",
            "0.5mg PO daily",
            "Reduced dose adjunct.",
            AdminRoute::Po,
        );
    }
}

fn acetaminophen(ctx: &PatientContext, acc: &mut Accumulator) {
    let (drug, route) = if ctx.is_npo() {
        ("Acetaminophen IV", AdminRoute::Iv)
    } else {
        ("Acetaminophen", AdminRoute::Po)
    };
    match ctx.hepatic {
        HepaticStatus::Failure => {
            acc.adjuvant("Analgesic", drug, "Max 2g/day", "Hepatic failure limit.", route);
            acc.warn("Acetaminophen: Max 2g/day in hepatic failure.");
        }
        HepaticStatus::Impaired => {
            acc.adjuvant("Analgesic", drug, "Max 3g/day", "Monitor LFTs.", route);
        }
        HepaticStatus::Normal => {
            acc.adjuvant(
                "Analgesic",
                drug,
                "650mg q6h (Max 4g/day)",
                "Multimodal opioid sparing.",
                route,
            );
        }
    }
}
