use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{
    AnalgesicProfile, ClinicalIndication, Hemodynamics, OpioidRoute, PainType, PatientContext,
};
use analgesia_core::models::recommendation::RecommendationType;

use crate::Axis;
use crate::accumulator::{Accumulator, Draft};

/// Home regimen: buprenorphine, methadone, chronic full agonists, naltrexone.
pub struct Profile;

impl Axis for Profile {
    fn name(&self) -> &str {
        "profile"
    }

    fn apply(&self, ctx: &PatientContext, acc: &mut Accumulator) {
        match ctx.profile {
            AnalgesicProfile::Naive => {}
            AnalgesicProfile::Buprenorphine => buprenorphine(ctx, acc),
            AnalgesicProfile::Methadone => methadone(ctx, acc),
            AnalgesicProfile::ChronicRx | AnalgesicProfile::HighPotency => chronic_agonist(ctx, acc),
            AnalgesicProfile::Naltrexone => naltrexone(ctx, acc),
        }

        if ctx.multiple_providers {
            acc.warn("PDMP ALERT: Multiple prescribers detected. Review the state PDMP before prescribing.");
        }
    }
}

fn buprenorphine(ctx: &PatientContext, acc: &mut Accumulator) {
    acc.remove_where(|r| r.molecule.is_low_affinity_agonist());

    acc.push_front(
        Draft::new(
            Molecule::Buprenorphine,
            Some(AdminRoute::Sublingual),
            RecommendationType::Safe,
            "Continue Buprenorphine",
        )
        .reason("Maintenance.")
        .detail("Continue home dose to prevent withdrawal and protect OUD remission."),
    );

    if ctx.indication == ClinicalIndication::Postoperative {
        acc.push(
            Draft::new(
                Molecule::Buprenorphine,
                None,
                RecommendationType::Caution,
                "Dose Reduction (Optional)",
            )
            .reason("Controversial.")
            .detail("For major surgery some protocols reduce to 8-12mg/day. Continuation is preferred (ASAM)."),
        );
    }

    acc.push(
        Draft::new(Molecule::Other, None, RecommendationType::Safe, "High-Affinity Full Agonist")
            .reason("Breakthrough.")
            .detail("Fentanyl or Hydromorphone on top of buprenorphine to overcome receptor occupancy."),
    );

    if !ctx.split_dosing {
        acc.push(
            Draft::new(Molecule::Buprenorphine, None, RecommendationType::Safe, "Split Home Dose")
                .reason("Optimization.")
                .detail("Divide daily dose q8h to use buprenorphine's analgesic half-life."),
        );
    }

    if ctx.is_npo() {
        acc.warn("NPO Status: Sublingual buprenorphine is acceptable. Use IV/SL formulations; avoid swallowed tablets.");
    }
    if ctx.is_pregnant {
        acc.warn("Buprenorphine in Pregnancy: Continue therapy. Neonatology consult recommended (Neonatal Withdrawal monitoring).");
    }
    if ctx.hepatic.is_failure() {
        acc.warn("LIVER FAILURE: Buprenorphine is hepatically cleared. Monitor LFTs and sedation.");
    }
}

fn methadone(ctx: &PatientContext, acc: &mut Accumulator) {
    acc.push_front(
        Draft::new(Molecule::Methadone, None, RecommendationType::Safe, "Continue Home Methadone")
            .reason("Maintenance.")
            .detail("Verify dose with the dispensing program. Split q8h for analgesia."),
    );
    if ctx.qtc_prolonged {
        acc.warn("QTc PROLONGED: AVOID METHADONE escalation. Avoid additional QT-prolonging agents (Zofran, Haldol).");
    }
}

fn chronic_agonist(ctx: &PatientContext, acc: &mut Accumulator) {
    let mut detail = "Continue home regimen to prevent withdrawal. Add breakthrough dosing.".to_string();
    if ctx.profile == AnalgesicProfile::HighPotency && ctx.tolerance_uncertain {
        detail.push_str(" Tolerance uncertain: Test Dose at 50% of calculated requirement.");
    }
    acc.push_front(
        Draft::new(Molecule::Other, None, RecommendationType::Safe, "Continue Home Meds")
            .reason("Baseline.")
            .detail(detail),
    );

    if ctx.indication == ClinicalIndication::Postoperative {
        acc.warn("SURGICAL MULTIPLIER: Expect 3x baseline opioid requirements after surgery.");
    }
    acc.warn("Opioid-Induced Hyperalgesia (OIH): Suspect if pain worsens despite dose escalation.");
    if ctx.profile == AnalgesicProfile::HighPotency {
        acc.warn("HIGH POTENCY: Standard MME tables UNDERESTIMATE tolerance to fentanyl analogues.");
    }

    let neuropathic_options = ctx.pain_type == PainType::Neuropathic
        && !ctx.hepatic.is_failure()
        && !ctx.qtc_prolonged
        && !ctx.is_npo()
        && ctx.route != OpioidRoute::Iv;
    if neuropathic_options {
        acc.push(
            Draft::drug(Molecule::Methadone, AdminRoute::Po, RecommendationType::Caution)
                .reason("Expert Consult.")
                .detail("NMDA antagonism for neuropathic pain. Specialist initiation only."),
        );
        acc.push(
            Draft::drug(Molecule::Tapentadol, AdminRoute::Po, RecommendationType::Caution)
                .reason("Alternative.")
                .detail("Dual mu-agonist and norepinephrine reuptake inhibition."),
        );
    }
}

fn naltrexone(ctx: &PatientContext, acc: &mut Accumulator) {
    acc.remove_where(|r| r.molecule.is_mu_agonist());
    acc.warn("BLOCKADE ACTIVE: Naltrexone blocks opioid analgesia. Standard opioid doses are ineffective.");

    let unstable = ctx.hemodynamics == Hemodynamics::Unstable;
    let ketamine = if unstable {
        acc.warn("Ketamine Caution: Sympathomimetic effects (hypertension, tachycardia) in unstable hemodynamics.");
        Draft::drug(Molecule::Ketamine, AdminRoute::Iv, RecommendationType::Caution)
            .reason("Caution.")
            .detail("Sub-anesthetic 0.1-0.3 mg/kg/hr. Monitor blood pressure and heart rate.")
    } else {
        Draft::drug(Molecule::Ketamine, AdminRoute::Iv, RecommendationType::Safe)
            .reason("Preferred.")
            .detail("Sub-anesthetic 0.1-0.3 mg/kg/hr. Opioid-independent analgesia.")
    };
    acc.push_front(ketamine);

    acc.push(
        Draft::new(Molecule::Other, None, RecommendationType::Safe, "Regional Anesthesia Consult")
            .reason("Preferred.")
            .detail("Nerve blocks or neuraxial techniques bypass the opioid blockade."),
    );
}
