use analgesia_core::models::patient::{HepaticStatus, PatientContext, RenalStatus};
use analgesia_dosing::methadone::{ConversionMethod, MethadoneConversionEngine, MethadoneRequest};
use analgesia_dosing::rounding::round_half;

fn request(total_mme: f64, age: u32) -> MethadoneRequest {
    MethadoneRequest {
        total_mme,
        age: Some(age),
        ..Default::default()
    }
}

fn count(warnings: &[String], needle: &str) -> usize {
    warnings.iter().filter(|w| w.contains(needle)).count()
}

#[test]
fn hundred_mme_adult_lands_in_band() {
    let result = MethadoneConversionEngine.calculate(&request(100.0, 50));
    assert!(!result.is_contraindicated_for_calculator);
    assert!(result.total_daily_dose >= 10.0 && result.total_daily_dose <= 12.5);
    assert_eq!(result.individual_dose, round_half(result.total_daily_dose / 3.0));
    assert_eq!(result.ratio_used, 8.0);
    assert_eq!(result.total_daily_dose, 12.0);
    assert_eq!(result.dosing_schedule, "Every 8 hours (TID)");
}

#[test]
fn hundred_mme_elderly_uses_conservative_ratio() {
    let result = MethadoneConversionEngine.calculate(&request(100.0, 70));
    assert_eq!(result.ratio_used, 20.0);
    assert!(result.total_daily_dose == 5.0 || result.total_daily_dose == 7.5);
    assert_eq!(result.original_daily_dose, Some(12.5));
    assert_eq!(count(&result.warnings, "ELDERLY PATIENT"), 1);
}

#[test]
fn qtc_prolongation_is_a_hard_stop() {
    let req = MethadoneRequest {
        qtc_prolonged: true,
        ..request(100.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&req);
    assert!(result.is_contraindicated_for_calculator);
    assert_eq!(result.total_daily_dose, 0.0);
    assert_eq!(result.ratio_used, 0.0);
    assert!(result.schedule.is_none());
    assert_eq!(count(&result.warnings, "Torsades"), 1);
    assert_eq!(count(&result.warnings, "SPECIALIST CONSULTATION MANDATORY"), 1);
}

#[test]
fn invalid_mme_has_no_rule() {
    let result = MethadoneConversionEngine.calculate(&request(-5.0, 50));
    assert!(result.is_contraindicated_for_calculator);
    assert_eq!(result.dosing_schedule, "Consult Pain Specialist");
}

#[test]
fn stepwise_schedule_has_three_steps() {
    let req = MethadoneRequest {
        method: ConversionMethod::Stepwise,
        ..request(300.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&req);
    assert_eq!(result.ratio_used, 12.0);
    assert_eq!(result.individual_dose, 8.5);
    let steps = result.schedule.unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].label, "Days 1-3");
    assert_eq!(steps[0].previous_opioid_percent, 66);
    assert_eq!(steps[0].previous_opioid_mme, 198);
    assert_eq!(steps[0].methadone_dose, 3.0);
    assert_eq!(steps[1].methadone_dose, 5.5);
    assert_eq!(steps[2].methadone_dose, 8.5);
    assert_eq!(steps[2].previous_opioid_percent, 0);
    assert!(result.warnings.iter().any(|w| w.contains("STEPWISE INDUCTION")));
}

#[test]
fn rapid_method_has_no_schedule() {
    let result = MethadoneConversionEngine.calculate(&request(300.0, 50));
    assert!(result.schedule.is_none());
}

#[test]
fn safety_protocol_appears_exactly_once_per_call() {
    let engine = MethadoneConversionEngine;
    let req = request(150.0, 40);
    for _ in 0..3 {
        let result = engine.calculate(&req);
        assert_eq!(count(&result.warnings, "METHADONE SAFETY PROTOCOL"), 1);
        assert_eq!(count(&result.warnings, "UNIDIRECTIONAL"), 1);
    }
}

#[test]
fn hepatic_failure_halves_dose() {
    let req = MethadoneRequest {
        hepatic: HepaticStatus::Failure,
        ..request(200.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&req);
    assert_eq!(result.total_daily_dose, 12.0);
    assert_eq!(result.original_daily_dose, Some(25.0));
    assert_eq!(count(&result.warnings, "HEPATIC FAILURE"), 1);
}

#[test]
fn floor_applies_from_thirty_mme() {
    let hepatic = MethadoneRequest {
        hepatic: HepaticStatus::Failure,
        ..request(40.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&hepatic);
    assert_eq!(result.total_daily_dose, 7.5);
    assert_eq!(count(&result.warnings, "APS minimum"), 1);
}

#[test]
fn manual_reduction_overrides_table() {
    let req = MethadoneRequest {
        manual_reduction_percent: Some(25.0),
        ..request(200.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&req);
    assert_eq!(result.reduction_applied, 0.25);
    assert_eq!(result.individual_dose, 6.5);
    assert_eq!(result.total_daily_dose, 19.5);
    assert_eq!(count(&result.warnings, "Applied 25% reduction"), 1);
}

#[test]
fn very_high_mme_is_capped() {
    let result = MethadoneConversionEngine.calculate(&request(2000.0, 50));
    assert_eq!(result.ratio_used, 20.0);
    assert_eq!(count(&result.warnings, "CAPPED at 40mg/day"), 1);
    assert_eq!(result.individual_dose, 13.0);
    assert_eq!(result.total_daily_dose, 39.0);
}

#[test]
fn capped_doses_never_exceed_the_ceiling_after_rounding() {
    for mme in [300.0, 450.0, 600.0, 900.0, 1200.0, 5000.0] {
        let result = MethadoneConversionEngine.calculate(&request(mme, 50));
        assert!(result.total_daily_dose <= 40.0, "{mme} MME gave {}", result.total_daily_dose);
    }
    let at_ceiling = MethadoneConversionEngine.calculate(&request(600.0, 50));
    assert_eq!(at_ceiling.individual_dose, 13.0);
}

#[test]
fn hard_safety_warnings_precede_dose_math() {
    let req = MethadoneRequest {
        renal: RenalStatus::Dialysis,
        hepatic: HepaticStatus::Failure,
        is_pregnant: true,
        is_breastfeeding: true,
        benzos: true,
        oud_context: true,
        ..request(100.0, 50)
    };
    let result = MethadoneConversionEngine.calculate(&req);
    assert!(result.warnings[0].starts_with("HEPATORENAL SYNDROME"));
    assert!(result.warnings[1].starts_with("PREGNANCY"));
    assert!(result.warnings[2].starts_with("LACTATION"));
    assert!(result.warnings[3].starts_with("BLACK BOX WARNING"));
    assert!(result.warnings[4].starts_with("OUD CONTEXT"));
}

#[test]
fn oud_context_carries_from_patient_context() {
    let ctx = PatientContext {
        age: "45".to_string(),
        oud_context: true,
        ..Default::default()
    };
    let req = MethadoneRequest::from_context(&ctx, 100.0, ConversionMethod::Rapid);
    assert!(req.oud_context);
    let result = MethadoneConversionEngine.calculate(&req);
    assert_eq!(count(&result.warnings, "OUD CONTEXT"), 1);

    let without = MethadoneRequest::from_context(&PatientContext::default(), 100.0, ConversionMethod::Rapid);
    assert!(!without.oud_context);
}
