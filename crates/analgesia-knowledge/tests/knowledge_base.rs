use analgesia_knowledge::error::KnowledgeError;
use analgesia_knowledge::{DrugKnowledgeBase, is_permitted_zero_factor};

fn document_with(drug_id: &str, factor: f64) -> String {
    format!(
        r#"{{
            "version": "test",
            "lastUpdated": "2025-01-15",
            "conversionFactors": {{
                "{drug_id}": {{
                    "routes": [{{
                        "route": "po",
                        "factor": {factor},
                        "unit": "mg",
                        "evidenceQuality": "high",
                        "source": "test",
                        "citation": "test"
                    }}]
                }}
            }}
        }}"#
    )
}

#[test]
fn bundled_table_loads() {
    let kb = DrugKnowledgeBase::bundled().unwrap();
    assert!(!kb.version().is_empty());
    assert!(kb.drug_ids().any(|id| id == "morphine"));
    assert!(!kb.global_warnings().is_empty());
    assert!(kb.evidence_definition("high").is_some());
}

#[test]
fn bundled_core_factors() {
    let kb = DrugKnowledgeBase::bundled().unwrap();
    assert_eq!(kb.factor_value("morphine", "po"), Some(1.0));
    assert_eq!(kb.factor_value("morphine", "iv"), Some(3.0));
    assert_eq!(kb.factor_value("oxycodone", "po"), Some(1.5));
    assert_eq!(kb.factor_value("hydromorphone", "iv"), Some(11.5));
    assert_eq!(kb.factor_value("fentanyl_patch", "transdermal"), Some(2.4));
    assert_eq!(kb.factor_value("buprenorphine", "sl"), Some(0.0));
}

#[test]
fn routes_must_match_exactly() {
    let kb = DrugKnowledgeBase::bundled().unwrap();
    assert_eq!(kb.factor_value("sufentanil", "iv_push"), None);
    assert_eq!(kb.factor_value("sufentanil", "iv_drip"), None);
    assert_eq!(kb.factor_value("morphine", "iv_continuous"), None);
    assert_eq!(kb.factor_value("oxycodone", "iv"), None);
    assert_eq!(kb.factor_value("oxycodone", "transdermal"), None);
    assert_eq!(kb.factor_value("unobtainium", "po"), None);
}

#[test]
fn iv_and_continuous_fentanyl_are_distinct_routes() {
    let kb = DrugKnowledgeBase::bundled().unwrap();
    assert_eq!(kb.factor_value("fentanyl", "iv_continuous"), Some(0.12));
    assert_eq!(kb.factor_value("fentanyl", "iv"), Some(0.3));
}

#[test]
fn zero_factor_rejected_for_full_agonist() {
    let err = DrugKnowledgeBase::from_json(&document_with("morphine", 0.0)).unwrap_err();
    match err {
        KnowledgeError::InvalidFactor { drug_id, factor, .. } => {
            assert_eq!(drug_id, "morphine");
            assert_eq!(factor, 0.0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn negative_factor_rejected_even_when_allow_listed() {
    let err = DrugKnowledgeBase::from_json(&document_with("buprenorphine", -1.0)).unwrap_err();
    assert!(matches!(err, KnowledgeError::InvalidFactor { .. }));
}

#[test]
fn zero_factor_accepted_for_allow_listed_ids() {
    for id in ["buprenorphine", "butrans", "sublingual_fentanyl", "suzetrigine"] {
        assert!(is_permitted_zero_factor(id), "{id}");
        DrugKnowledgeBase::from_json(&document_with(id, 0.0)).unwrap();
    }
}

#[test]
fn allow_list_is_exact_not_by_name_fragment() {
    assert!(!is_permitted_zero_factor("buprenorphine_patch"));
    let err = DrugKnowledgeBase::from_json(&document_with("buprenorphine_patch", 0.0)).unwrap_err();
    assert!(matches!(err, KnowledgeError::InvalidFactor { drug_id, .. } if drug_id == "buprenorphine_patch"));
}

#[test]
fn drug_without_routes_is_rejected() {
    let json = r#"{
        "version": "test",
        "lastUpdated": "2025-01-15",
        "conversionFactors": { "morphine": { "routes": [] } }
    }"#;
    let err = DrugKnowledgeBase::from_json(json).unwrap_err();
    assert!(matches!(err, KnowledgeError::MissingRoutes(id) if id == "morphine"));
}

#[test]
fn malformed_date_is_a_serialization_error() {
    let json = document_with("morphine", 1.0).replace("2025-01-15", "last tuesday");
    let err = DrugKnowledgeBase::from_json(&json).unwrap_err();
    assert!(matches!(err, KnowledgeError::Serialization(_)));
}

#[test]
fn pharmacology_is_optional_display_data() {
    let kb = DrugKnowledgeBase::bundled().unwrap();
    let fentanyl = kb.pharmacology("fentanyl").unwrap();
    assert!(fentanyl.safety_profile.renal_note.contains("No active metabolites"));
    assert!(!kb.pharmacology_all().is_empty());

    let bare = DrugKnowledgeBase::from_json(&document_with("morphine", 1.0)).unwrap();
    assert!(bare.pharmacology("morphine").is_none());
    assert!(bare.pharmacology_all().is_empty());
}

#[test]
fn missing_file_reports_path() {
    let err = DrugKnowledgeBase::load(std::path::Path::new("/nonexistent/kb.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/kb.json"));
}
