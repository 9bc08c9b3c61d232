use analgesia_assessment::gate::SafetyGateValidator;
use analgesia_assessment::generator::RecommendationGenerator;
use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::patient::{AnalgesicProfile, HepaticStatus, PatientContext, RenalStatus};
use analgesia_core::models::recommendation::{
    DrugRecommendation, RecommendationId, RecommendationType,
};

fn rec(id: u32, molecule: Molecule, route: AdminRoute) -> DrugRecommendation {
    DrugRecommendation {
        id: RecommendationId(id),
        molecule,
        route: Some(route),
        name: format!("{} {}", molecule.display_name(), route.label()),
        reason: String::new(),
        detail: String::new(),
        kind: RecommendationType::Safe,
    }
}

/// A list no generator path would produce, to check the gate on its own.
fn everything() -> Vec<DrugRecommendation> {
    vec![
        rec(0, Molecule::Morphine, AdminRoute::Po),
        rec(1, Molecule::Codeine, AdminRoute::Po),
        rec(2, Molecule::Tramadol, AdminRoute::Po),
        rec(3, Molecule::Oxycodone, AdminRoute::Po),
        rec(4, Molecule::Methadone, AdminRoute::Po),
        rec(5, Molecule::Meperidine, AdminRoute::Iv),
        rec(6, Molecule::Fentanyl, AdminRoute::Iv),
        rec(7, Molecule::Hydromorphone, AdminRoute::Iv),
    ]
}

fn surviving(ctx: &PatientContext) -> Vec<Molecule> {
    let report = SafetyGateValidator.validate(ctx, &everything());
    report.apply(everything()).into_iter().map(|r| r.molecule).collect()
}

#[test]
fn clean_context_passes_everything() {
    let report = SafetyGateValidator.validate(&PatientContext::default(), &everything());
    assert!(report.errors.is_empty());
    assert!(report.removals.is_empty());
}

#[test]
fn renal_gate_removes_metabolite_formers() {
    let ctx = PatientContext {
        renal: RenalStatus::Impaired,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().all(|e| e.starts_with("SAFETY GATE FAILURE")));
    assert!(report.errors[0].contains("Morphine"));
    assert!(report.errors[0].contains("eGFR < 60"));

    let left = surviving(&ctx);
    assert!(!left.contains(&Molecule::Morphine));
    assert!(!left.contains(&Molecule::Codeine));
    assert!(!left.contains(&Molecule::Meperidine));
    assert!(left.contains(&Molecule::Tramadol));
    assert!(left.contains(&Molecule::Fentanyl));
}

#[test]
fn severe_encephalopathy_triggers_decompensated_gate() {
    let ctx = PatientContext {
        hepatic: HepaticStatus::Failure,
        encephalopathy_grade: 3,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert!(report.errors.iter().any(|e| e.contains("Decompensated Hepatic Failure")));
    assert_eq!(
        surviving(&ctx),
        vec![Molecule::Meperidine, Molecule::Fentanyl, Molecule::Hydromorphone]
    );
}

#[test]
fn mild_encephalopathy_alone_does_not_trigger_decompensated_gate() {
    let ctx = PatientContext {
        hepatic: HepaticStatus::Failure,
        encephalopathy_grade: 2,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert!(report.errors.is_empty());
}

#[test]
fn hepatorenal_double_hit_names_methadone() {
    let ctx = PatientContext {
        hepatic: HepaticStatus::Failure,
        renal: RenalStatus::Dialysis,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert!(report.errors.iter().any(|e| e.contains("multi-organ dysfunction")));
    assert!(!surviving(&ctx).contains(&Molecule::Methadone));
}

#[test]
fn qtc_gate_removes_methadone_with_torsades_warning() {
    let ctx = PatientContext {
        qtc_prolonged: true,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("QTc"));
    assert!(report.errors[0].contains("Torsades"));
    assert!(report.removals.contains(&RecommendationId(4)));
}

#[test]
fn qtc_gate_catches_home_methadone_from_generator() {
    let ctx = PatientContext {
        profile: AnalgesicProfile::Methadone,
        qtc_prolonged: true,
        ..Default::default()
    };
    let plan = RecommendationGenerator::new().generate(&ctx);
    assert!(plan.recommendations.iter().any(|r| r.name == "Continue Home Methadone"));

    let report = SafetyGateValidator.validate(&ctx, &plan.recommendations);
    assert!(report.errors.iter().any(|e| e.contains("SAFETY GATE") && e.contains("QTc")));
    let shown = report.apply(plan.recommendations);
    assert!(shown.iter().all(|r| r.molecule != Molecule::Methadone));
}

#[test]
fn methadone_in_high_risk_naive_patient_warns_without_removal() {
    let ctx = PatientContext {
        history_overdose: true,
        ..Default::default()
    };
    let report = SafetyGateValidator.validate(&ctx, &everything());
    assert!(report.errors.iter().any(|e| e.starts_with("CRITICAL: Methadone")));
    assert!(report.removals.is_empty());

    let tolerant = PatientContext {
        profile: AnalgesicProfile::ChronicRx,
        ..ctx
    };
    assert!(SafetyGateValidator.validate(&tolerant, &everything()).errors.is_empty());
}

#[test]
fn population_gates_remove_codeine_and_tramadol() {
    let cases = [
        (
            PatientContext {
                is_pregnant: true,
                ..Default::default()
            },
            "PREGNANCY GATE",
        ),
        (
            PatientContext {
                age: "9".to_string(),
                ..Default::default()
            },
            "PEDIATRIC GATE",
        ),
        (
            PatientContext {
                is_breastfeeding: true,
                ..Default::default()
            },
            "BREASTFEEDING GATE",
        ),
    ];
    for (ctx, label) in cases {
        let report = SafetyGateValidator.validate(&ctx, &everything());
        assert_eq!(report.errors.iter().filter(|e| e.starts_with(label)).count(), 2);
        let left = surviving(&ctx);
        assert!(!left.contains(&Molecule::Codeine));
        assert!(!left.contains(&Molecule::Tramadol));
    }
}

#[test]
fn unknown_age_is_not_pediatric() {
    let ctx = PatientContext {
        age: "unknown".to_string(),
        ..Default::default()
    };
    assert!(SafetyGateValidator.validate(&ctx, &everything()).errors.is_empty());
}

#[test]
fn removal_keeps_order_of_survivors() {
    let ctx = PatientContext {
        renal: RenalStatus::Dialysis,
        is_pregnant: true,
        ..Default::default()
    };
    assert_eq!(
        surviving(&ctx),
        vec![Molecule::Oxycodone, Molecule::Methadone, Molecule::Fentanyl, Molecule::Hydromorphone]
    );
}
