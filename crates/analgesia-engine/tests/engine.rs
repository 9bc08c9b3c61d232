use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{
    AnalgesicProfile, GiStatus, Hemodynamics, HepaticStatus, PainType, PatientContext, RenalStatus,
    Sex,
};
use analgesia_core::models::risk::RiskTier;
use analgesia_dosing::conversion::{DoseEntry, EntryOutcome};
use analgesia_dosing::infusion::{DripSettings, InfusionDrug, InfusionDuration, PcaSettings};
use analgesia_dosing::methadone::{ConversionMethod, MethadoneRequest};
use analgesia_engine::{ClinicalEngine, EngineError};

fn engine() -> ClinicalEngine {
    ClinicalEngine::bundled().unwrap()
}

#[test]
fn full_pipeline_is_idempotent() {
    let engine = engine();
    let contexts = [
        PatientContext::default(),
        PatientContext {
            age: "82".to_string(),
            renal: RenalStatus::Dialysis,
            hepatic: HepaticStatus::Failure,
            benzos: true,
            copd: true,
            ..Default::default()
        },
        PatientContext {
            profile: AnalgesicProfile::Naltrexone,
            hemodynamics: Hemodynamics::Unstable,
            gi: GiStatus::Npo,
            ..Default::default()
        },
    ];
    for ctx in contexts {
        let first = engine.assess(&ctx);
        for _ in 0..5 {
            let again = engine.assess(&ctx);
            assert_eq!(again.recommendations.len(), first.recommendations.len());
            assert_eq!(again.warnings.len(), first.warnings.len());
            assert_eq!(again.risk.score, first.risk.score);
            assert_eq!(again, first);
        }
    }
}

#[test]
fn gate_removals_are_applied_before_display() {
    let ctx = PatientContext {
        profile: AnalgesicProfile::Methadone,
        qtc_prolonged: true,
        ..Default::default()
    };
    let outcome = engine().assess(&ctx);
    assert!(outcome.gate_tripped());
    assert!(outcome.gate_failures.iter().any(|e| e.contains("Torsades")));
    assert!(outcome.recommendations.iter().all(|r| r.molecule != Molecule::Methadone));
    assert!(outcome.warnings.iter().any(|w| w.contains("QTc PROLONGED")));
    assert!(outcome.monitoring_plan.iter().any(|m| m.contains("ECG")));
}

#[test]
fn warnings_are_merged_without_duplicates() {
    let ctx = PatientContext {
        benzos: true,
        ..Default::default()
    };
    let outcome = engine().assess(&ctx);
    let black_box: Vec<_> = outcome.warnings.iter().filter(|w| w.contains("3.8x")).collect();
    assert_eq!(black_box.len(), 1);
    assert_eq!(outcome.risk.tier, RiskTier::Intermediate);
}

#[test]
fn advisory_adjuvants_do_not_repeat_generator_agents() {
    let ctx = PatientContext {
        renal: RenalStatus::Impaired,
        pain_type: PainType::Neuropathic,
        gi: GiStatus::Npo,
        ..Default::default()
    };
    let outcome = engine().assess(&ctx);
    let acetaminophen = outcome
        .adjuvants
        .iter()
        .filter(|a| a.drug.starts_with("Acetaminophen"))
        .count();
    assert_eq!(acetaminophen, 1);
    assert!(outcome.adjuvants.iter().all(|a| !a.route.is_enteral()));
}

#[test]
fn dialysis_outcome_leads_with_fentanyl() {
    let outcome = engine().assess(&PatientContext {
        age: "68".to_string(),
        sex: Sex::Female,
        renal: RenalStatus::Dialysis,
        ..Default::default()
    });
    assert!(outcome.recommendations[0].is(Molecule::Fentanyl, AdminRoute::Iv));
    assert!(
        outcome
            .recommendations
            .iter()
            .all(|r| !r.molecule.has_renal_toxic_metabolites())
    );
    // 8 (age) + 3 (naive) + 8 (renal)
    assert_eq!(outcome.risk.score, 19);
}

#[test]
fn context_errors_surface_from_json() {
    let engine = engine();
    let outcome = engine
        .assess_json(r#"{"age": "70", "hepatic": "failure", "renal": "impaired"}"#)
        .unwrap();
    assert!(outcome.warnings.iter().any(|w| w.contains("Hepatorenal")));

    let err = engine.assess_json(r#"{"current_mme": "a lot"}"#).unwrap_err();
    assert!(matches!(err, EngineError::Context(_)));
}

#[test]
fn total_mme_sums_oral_regimen() {
    let entries = [
        DoseEntry::new("morphine", "po", 30.0),
        DoseEntry::new("oxycodone", "po", 20.0),
    ];
    let summary = engine().total_mme(&entries, &PatientContext::default());
    assert_eq!(summary.total_mme, 60.0);
    assert_eq!(summary.display, "60.0");
}

#[test]
fn unknown_entry_does_not_zero_the_total() {
    let entries = [
        DoseEntry::new("morphine", "po", 30.0),
        DoseEntry::new("unobtainium", "po", 10.0),
    ];
    let summary = engine().total_mme(&entries, &PatientContext::default());
    assert_eq!(summary.total_mme, 30.0);
    assert!(
        summary
            .entries
            .iter()
            .any(|e| matches!(e, EntryOutcome::Unresolved { .. }))
    );
}

#[test]
fn target_doses_reject_full_reduction() {
    let err = engine()
        .target_doses(60.0, 100.0, &PatientContext::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::Dosing(_)));
}

#[test]
fn methadone_passes_through() {
    let ctx = PatientContext {
        age: "50".to_string(),
        ..Default::default()
    };
    let req = MethadoneRequest::from_context(&ctx, 100.0, ConversionMethod::Rapid);
    let result = engine().methadone(&req);
    assert!(!result.is_contraindicated_for_calculator);
    assert!((10.0..=12.5).contains(&result.total_daily_dose));
}

#[test]
fn pca_report_combines_limits_and_warnings() {
    let report = engine()
        .pca(&PcaSettings::default(), &PatientContext::default())
        .unwrap();
    assert_eq!(report.limits.max_doses_per_hour, 6.0);
    assert_eq!(report.limits.one_hour_limit, 6.0);
    assert_eq!(report.limits.four_hour_limit, 24.0);
}

#[test]
fn drip_report_carries_risk_multiplier() {
    let settings = DripSettings {
        drug: InfusionDrug::Morphine,
        concentration: 1.0,
        rate_ml_hr: 2.0,
        duration: InfusionDuration::Continuous,
    };
    let ctx = PatientContext {
        age: "40".to_string(),
        ..Default::default()
    };
    let report = engine().drip(&settings, &ctx).unwrap();
    assert_eq!(report.summary.daily_dose, 48.0);
    assert_eq!(report.risk_multiplier, 1.0);
}
