use analgesia_core::models::molecule::{AdminRoute, Molecule};
use analgesia_core::models::recommendation::{
    AdjuvantRecommendation, DrugRecommendation, RecommendationId, RecommendationType,
};

/// A recommendation before it has been given an identity.
#[derive(Debug, Clone)]
pub struct Draft {
    pub molecule: Molecule,
    pub route: Option<AdminRoute>,
    pub name: String,
    pub reason: String,
    pub detail: String,
    pub kind: RecommendationType,
}

impl Draft {
    pub fn new(molecule: Molecule, route: Option<AdminRoute>, kind: RecommendationType, name: &str) -> Self {
        Self {
            molecule,
            route,
            name: name.to_string(),
            reason: String::new(),
            detail: String::new(),
            kind,
        }
    }

    /// Named `"{molecule} {route}"`, e.g. "Fentanyl IV".
    pub fn drug(molecule: Molecule, route: AdminRoute, kind: RecommendationType) -> Self {
        let name = format!("{} {}", molecule.display_name(), route.label());
        Self::new(molecule, Some(route), kind, &name)
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

/// Working state of one generator run.
///
/// Ids are handed out sequentially from zero, so the same context always
/// produces the same ids.
#[derive(Debug, Default)]
pub struct Accumulator {
    next_id: u32,
    recommendations: Vec<DrugRecommendation>,
    adjuvants: Vec<AdjuvantRecommendation>,
    warnings: Vec<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self, draft: Draft) -> DrugRecommendation {
        let id = RecommendationId(self.next_id);
        self.next_id += 1;
        DrugRecommendation {
            id,
            molecule: draft.molecule,
            route: draft.route,
            name: draft.name,
            reason: draft.reason,
            detail: draft.detail,
            kind: draft.kind,
        }
    }

    /// Same name, or same molecule by the same concrete route.
    fn duplicates(&self, draft: &Draft) -> bool {
        self.recommendations.iter().any(|r| {
            r.name == draft.name
                || (draft.route.is_some() && r.molecule == draft.molecule && r.route == draft.route)
        })
    }

    /// Append unless an equivalent entry is already present.
    pub fn push(&mut self, draft: Draft) -> bool {
        if self.duplicates(&draft) {
            return false;
        }
        let rec = self.issue(draft);
        self.recommendations.push(rec);
        true
    }

    /// Insert at position 0 unless an equivalent entry is already present.
    pub fn push_front(&mut self, draft: Draft) -> bool {
        if self.duplicates(&draft) {
            return false;
        }
        let rec = self.issue(draft);
        self.recommendations.insert(0, rec);
        true
    }

    /// Move an existing entry to position 0. Returns false when absent.
    pub fn hoist(&mut self, molecule: Molecule, route: AdminRoute) -> bool {
        match self.recommendations.iter().position(|r| r.is(molecule, route)) {
            Some(idx) => {
                let rec = self.recommendations.remove(idx);
                self.recommendations.insert(0, rec);
                true
            }
            None => false,
        }
    }

    /// Hoist the entry if present, otherwise insert the draft at the front.
    pub fn ensure_front(&mut self, draft: Draft) {
        let hoisted = match draft.route {
            Some(route) => self.hoist(draft.molecule, route),
            None => false,
        };
        if !hoisted {
            self.push_front(draft);
        }
    }

    pub fn remove_molecules(&mut self, molecules: &[Molecule]) {
        self.recommendations.retain(|r| !molecules.contains(&r.molecule));
    }

    pub fn remove_where(&mut self, pred: impl Fn(&DrugRecommendation) -> bool) {
        self.recommendations.retain(|r| !pred(r));
    }

    pub fn contains(&self, molecule: Molecule, route: AdminRoute) -> bool {
        self.recommendations.iter().any(|r| r.is(molecule, route))
    }

    pub fn find_mut(&mut self, molecule: Molecule, route: AdminRoute) -> Option<&mut DrugRecommendation> {
        self.recommendations.iter_mut().find(|r| r.is(molecule, route))
    }

    pub fn recommendations(&self) -> &[DrugRecommendation] {
        &self.recommendations
    }

    pub fn recommendations_mut(&mut self) -> impl Iterator<Item = &mut DrugRecommendation> {
        self.recommendations.iter_mut()
    }

    /// Append a warning once.
    pub fn warn(&mut self, warning: impl Into<String>) {
        let warning = warning.into();
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Append an adjuvant unless the same drug is already listed.
    pub fn adjuvant(&mut self, category: &str, drug: &str, dose: &str, rationale: &str, route: AdminRoute) {
        if self.adjuvants.iter().any(|a| a.drug == drug) {
            return;
        }
        self.adjuvants.push(AdjuvantRecommendation {
            category: category.to_string(),
            drug: drug.to_string(),
            dose: dose.to_string(),
            rationale: rationale.to_string(),
            route,
        });
    }

    pub fn retain_adjuvants(&mut self, keep: impl Fn(&AdjuvantRecommendation) -> bool) {
        self.adjuvants.retain(|a| keep(a));
    }

    pub fn adjuvants(&self) -> &[AdjuvantRecommendation] {
        &self.adjuvants
    }

    pub fn into_parts(self) -> (Vec<DrugRecommendation>, Vec<AdjuvantRecommendation>, Vec<String>) {
        (self.recommendations, self.adjuvants, self.warnings)
    }
}
