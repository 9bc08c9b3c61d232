use std::sync::Arc;

use analgesia_core::models::patient::{
    AnalgesicProfile, GiStatus, HepaticStatus, PatientContext, RenalStatus,
};
use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_dosing::conversion::{
    ComplianceLevel, ConversionContext, DEFAULT_REDUCTION_PERCENT, DoseConversionEngine, DoseEntry,
    EntryOutcome, TargetDoseReport,
};
use analgesia_dosing::error::DosingError;
use analgesia_knowledge::DrugKnowledgeBase;

fn engine() -> DoseConversionEngine {
    DoseConversionEngine::new(Arc::new(DrugKnowledgeBase::bundled().unwrap()))
}

fn target<'a>(report: &'a TargetDoseReport, molecule: Molecule, route: AdminRoute) -> &'a str {
    &report
        .targets
        .iter()
        .find(|t| t.molecule == molecule && t.route == route)
        .unwrap()
        .total_daily
}

#[test]
fn morphine_and_oxycodone_sum_to_sixty() {
    let summary = engine().aggregate(
        &[DoseEntry::new("morphine", "po", 30.0), DoseEntry::new("oxycodone", "po", 20.0)],
        &ConversionContext::default(),
    );
    assert_eq!(summary.total_mme, 60.0);
    assert_eq!(summary.display, "60.0");
}

#[test]
fn iv_morphine_is_three_to_one() {
    let summary = engine().aggregate(&[DoseEntry::new("morphine", "iv", 10.0)], &ConversionContext::default());
    assert_eq!(summary.display, "30.0");
}

#[test]
fn fentanyl_patch_25_is_60_mme() {
    let summary = engine().aggregate(
        &[DoseEntry::new("fentanyl_patch", "transdermal", 25.0)],
        &ConversionContext::default(),
    );
    assert!((summary.total_mme - 60.0).abs() < 1e-9);
}

#[test]
fn bad_entries_do_not_zero_the_total() {
    let summary = engine().aggregate(
        &[
            DoseEntry::new("morphine", "po", 30.0),
            DoseEntry::new("unobtainium", "po", 10.0),
            DoseEntry::new("oxycodone", "transdermal", 5.0),
            DoseEntry::new("hydrocodone", "po", -4.0),
        ],
        &ConversionContext::default(),
    );
    assert_eq!(summary.total_mme, 30.0);
    let unresolved = summary
        .entries
        .iter()
        .filter(|e| matches!(e, EntryOutcome::Unresolved { .. }))
        .count();
    assert_eq!(unresolved, 3);
}

#[test]
fn entry_lookup_errors_are_specific() {
    let engine = engine();
    assert!(matches!(
        engine.entry_mme(&DoseEntry::new("unobtainium", "po", 1.0)),
        Err(DosingError::UnknownDrug(_))
    ));
    assert!(matches!(
        engine.entry_mme(&DoseEntry::new("oxycodone", "transdermal", 1.0)),
        Err(DosingError::UnknownRoute { .. })
    ));
}

#[test]
fn only_excluded_agents_display_dashes() {
    let summary = engine().aggregate(
        &[DoseEntry::new("buprenorphine", "sl", 16.0)],
        &ConversionContext::default(),
    );
    assert_eq!(summary.display, "---");
    assert_eq!(summary.excluded, vec!["buprenorphine".to_string()]);
    assert!(summary.warnings.iter().any(|w| w.contains("Excluded from MME")));
}

#[test]
fn high_total_triggers_naloxone_warning() {
    let summary = engine().aggregate(&[DoseEntry::new("oxycodone", "po", 80.0)], &ConversionContext::default());
    assert!(summary.warnings.iter().any(|w| w.contains(">90 MME")));
    assert!(summary.warnings.iter().any(|w| w.starts_with("Naloxone: Co-prescribe")));
}

#[test]
fn drip_routes_without_a_drip_factor_are_unresolved() {
    let summary = engine().aggregate(
        &[
            DoseEntry::new("sufentanil", "iv_drip", 10.0),
            DoseEntry::new("morphine", "iv_continuous", 2.0),
            DoseEntry::new("morphine", "iv_drip", 2.0),
        ],
        &ConversionContext::default(),
    );
    assert!(matches!(&summary.entries[0], EntryOutcome::Unresolved { drug_id, .. } if drug_id == "sufentanil"));
    assert!(matches!(&summary.entries[1], EntryOutcome::Unresolved { .. }));
    assert!((summary.total_mme - 144.0).abs() < 1e-9);
}

fn checks_for(drug_id: &str, route: &str, dose: f64) -> Vec<String> {
    let summary = engine().aggregate(&[DoseEntry::new(drug_id, route, dose)], &ConversionContext::default());
    match summary.entries.into_iter().next().unwrap() {
        EntryOutcome::Counted { checks, .. } => checks,
        other => panic!("expected a counted entry, got {other:?}"),
    }
}

#[test]
fn microgram_inputs_below_ten_suggest_a_unit_error() {
    assert!(checks_for("fentanyl", "iv", 5.0)[0].contains("Verify MICROGRAMS"));
    assert!(checks_for("fentanyl_patch", "transdermal", 2.0)[0].contains("Verify MICROGRAMS"));
    assert!(checks_for("fentanyl", "iv", 50.0).is_empty());
    assert!(checks_for("morphine", "po", 5.0).is_empty());
}

#[test]
fn sub_microgram_sufentanil_flags_decimal_error() {
    let checks = checks_for("sufentanil", "iv", 0.5);
    assert_eq!(checks.len(), 1);
    assert!(checks[0].contains("decimal error"));
    assert!(checks_for("alfentanil", "iv", 0.2)[0].starts_with("CRITICAL"));
}

#[test]
fn implausible_single_doses_are_flagged() {
    assert_eq!(checks_for("hydromorphone", "iv", 6.0), vec!["Unusually high single dose (>4mg). Verify."]);
    assert_eq!(checks_for("morphine", "iv", 25.0), vec!["Unusually high single dose (>20mg). Verify."]);
    assert_eq!(checks_for("fentanyl", "iv", 250.0), vec!["Unusually high single dose (>200mcg). Verify."]);
    assert_eq!(checks_for("oxycodone", "po", 150.0), vec!["Unusually high single dose (>120mg). Verify."]);
    assert!(checks_for("hydromorphone", "iv", 4.0).is_empty());
    assert!(checks_for("morphine", "po", 200.0).is_empty());
}

#[test]
fn methadone_total_is_surveillance_only() {
    let summary = engine().aggregate(&[DoseEntry::new("methadone", "po", 10.0)], &ConversionContext::default());
    assert!((summary.total_mme - 47.0).abs() < 1e-9);
    assert!(summary.warnings.iter().any(|w| w.starts_with("METHADONE DETECTED")));
    assert!(summary.warnings.iter().any(|w| w.contains("converting FROM methadone")));
}

#[test]
fn methadone_is_not_summed_in_pregnancy() {
    let ctx = ConversionContext {
        is_pregnant: true,
        ..Default::default()
    };
    let summary = engine().aggregate(
        &[DoseEntry::new("methadone", "po", 20.0), DoseEntry::new("morphine", "po", 10.0)],
        &ctx,
    );
    assert_eq!(summary.total_mme, 10.0);
    assert!(summary.warnings.iter().any(|w| w.contains("PREGNANCY")));
}

#[test]
fn renal_unsafe_entry_is_flagged() {
    let ctx = ConversionContext {
        renal: RenalStatus::Impaired,
        ..Default::default()
    };
    let summary = engine().aggregate(&[DoseEntry::new("morphine", "po", 30.0)], &ctx);
    assert!(summary.warnings.iter().any(|w| w.starts_with("Renal: morphine")));
}

#[test]
fn sixty_mme_with_thirty_percent_reduction_is_28mg_oxycodone() {
    let report = engine()
        .target_doses(60.0, DEFAULT_REDUCTION_PERCENT, &ConversionContext::default())
        .unwrap();
    assert!((report.reduced_mme - 42.0).abs() < 1e-9);
    assert_eq!(report.compliance.level, ComplianceLevel::Standard);
    assert_eq!(target(&report, Molecule::Oxycodone, AdminRoute::Po), "28 mg");
    assert_eq!(target(&report, Molecule::Hydromorphone, AdminRoute::Po), "8.5 mg");
    assert_eq!(target(&report, Molecule::Fentanyl, AdminRoute::Iv), "140.0 mcg");
    assert_eq!(target(&report, Molecule::Fentanyl, AdminRoute::Transdermal), "12 mcg/hr");
}

#[test]
fn patch_label_states_rounding_direction() {
    let report = engine().target_doses(60.0, 30.0, &ConversionContext::default()).unwrap();
    let patch = report
        .targets
        .iter()
        .find(|t| t.route == AdminRoute::Transdermal)
        .unwrap();
    assert_eq!(patch.ratio_label, "Rounded DOWN from 21.0 mcg/hr");

    let low = engine().target_doses(20.0, 30.0, &ConversionContext::default()).unwrap();
    assert_eq!(target(&low, Molecule::Fentanyl, AdminRoute::Transdermal), "N/A");
}

#[test]
fn patch_targets_are_half_the_daily_mme() {
    let engine = engine();
    let ctx = ConversionContext::default();
    for (mme, expected) in [(50.0, "25 mcg/hr"), (100.0, "50 mcg/hr"), (150.0, "75 mcg/hr"), (210.0, "100 mcg/hr")] {
        let report = engine.target_doses(mme, 0.0, &ctx).unwrap();
        assert_eq!(target(&report, Molecule::Fentanyl, AdminRoute::Transdermal), expected, "{mme} MME");
    }
}

#[test]
fn patch_target_caps_at_largest_strength() {
    let report = engine().target_doses(300.0, 0.0, &ConversionContext::default()).unwrap();
    let patch = report
        .targets
        .iter()
        .find(|t| t.route == AdminRoute::Transdermal)
        .unwrap();
    assert_eq!(patch.total_daily, "100 mcg/hr");
    assert_eq!(patch.ratio_label, "Rounded DOWN from 150.0 mcg/hr");
    assert!(patch.adjustments.iter().any(|a| a.contains("largest patch strength")));
}

#[test]
fn compliance_levels() {
    let ctx = ConversionContext::default();
    let engine = engine();
    assert_eq!(engine.target_doses(60.0, 10.0, &ctx).unwrap().compliance.level, ComplianceLevel::Aggressive);
    assert_eq!(engine.target_doses(60.0, 50.0, &ctx).unwrap().compliance.level, ComplianceLevel::Standard);
    assert_eq!(engine.target_doses(60.0, 60.0, &ctx).unwrap().compliance.level, ComplianceLevel::Conservative);
}

#[test]
fn reduction_out_of_range_is_rejected() {
    let err = engine().target_doses(60.0, 100.0, &ConversionContext::default()).unwrap_err();
    assert!(matches!(err, DosingError::InvalidParameter { .. }));
}

#[test]
fn dialysis_avoids_morphine_and_halves_hydromorphone() {
    let ctx = ConversionContext {
        renal: RenalStatus::Dialysis,
        ..Default::default()
    };
    let report = engine().target_doses(60.0, 30.0, &ctx).unwrap();
    assert_eq!(target(&report, Molecule::Morphine, AdminRoute::Po), "AVOID");
    assert_eq!(target(&report, Molecule::Morphine, AdminRoute::Iv), "AVOID");
    assert_eq!(target(&report, Molecule::Hydromorphone, AdminRoute::Po), "4 mg");
    let hydro = report
        .targets
        .iter()
        .find(|t| t.molecule == Molecule::Hydromorphone)
        .unwrap();
    assert!(hydro.adjustments.iter().any(|a| a.contains("50%")));
}

#[test]
fn mild_renal_impairment_labels_without_reducing() {
    let ctx = ConversionContext {
        renal: RenalStatus::Impaired,
        ..Default::default()
    };
    let report = engine().target_doses(60.0, 30.0, &ctx).unwrap();
    assert_eq!(target(&report, Molecule::Hydromorphone, AdminRoute::Po), "8.5 mg");
    let hydro = report
        .targets
        .iter()
        .find(|t| t.molecule == Molecule::Hydromorphone)
        .unwrap();
    assert!(hydro.adjustments.iter().any(|a| a.contains("Caution")));
    assert!(!hydro.adjustments.iter().any(|a| a.contains("50%")));
    let morphine = report.targets.iter().find(|t| t.molecule == Molecule::Morphine).unwrap();
    assert!(morphine.adjustments.iter().any(|a| a.contains("Consider -25%")));
}

#[test]
fn hepatic_failure_consults_on_oral_hydromorphone() {
    let ctx = ConversionContext {
        hepatic: HepaticStatus::Failure,
        ..Default::default()
    };
    let report = engine().target_doses(60.0, 30.0, &ctx).unwrap();
    assert_eq!(target(&report, Molecule::Hydromorphone, AdminRoute::Po), "CONSULT");
    assert_eq!(target(&report, Molecule::Oxycodone, AdminRoute::Po), "14 mg");
    assert_eq!(target(&report, Molecule::Fentanyl, AdminRoute::Iv), "140.0 mcg");
}

#[test]
fn pediatric_and_naltrexone_block_targets() {
    let pediatric = PatientContext {
        age: "12".to_string(),
        ..Default::default()
    };
    let report = engine()
        .target_doses(60.0, 30.0, &ConversionContext::from(&pediatric))
        .unwrap();
    assert!(report.targets.is_empty());
    assert!(report.blocked.unwrap().contains("Pediatric"));

    let blocked = ConversionContext {
        profile: AnalgesicProfile::Naltrexone,
        ..Default::default()
    };
    let report = engine().target_doses(60.0, 30.0, &blocked).unwrap();
    assert!(report.targets.is_empty());
    assert!(report.blocked.is_some());
}

#[test]
fn gi_status_orders_targets() {
    let engine = engine();
    let npo = ConversionContext {
        gi: GiStatus::Npo,
        ..Default::default()
    };
    let report = engine.target_doses(60.0, 30.0, &npo).unwrap();
    assert_eq!(report.targets[0].route, AdminRoute::Iv);

    let tube = ConversionContext {
        gi: GiStatus::Tube,
        ..Default::default()
    };
    let report = engine.target_doses(60.0, 30.0, &tube).unwrap();
    assert_eq!(report.targets[0].formulation, "PO Liquid");

    let report = engine.target_doses(60.0, 30.0, &ConversionContext::default()).unwrap();
    assert_eq!(report.targets[0].route, AdminRoute::Po);
}
