use std::path::Path;
use std::sync::Arc;

use analgesia_assessment::advisory::SafetyAdvisory;
use analgesia_assessment::gate::SafetyGateValidator;
use analgesia_assessment::generator::RecommendationGenerator;
use analgesia_assessment::risk::RiskScoreCalculator;
use analgesia_assessment::validation::ContextValidator;
use analgesia_core::models::patient::PatientContext;
use analgesia_core::models::recommendation::AdjuvantRecommendation;
use analgesia_dosing::conversion::{
    ConversionContext, DoseConversionEngine, DoseEntry, MmeSummary, TargetDoseReport,
};
use analgesia_dosing::infusion::{DripSettings, PcaSettings};
use analgesia_dosing::methadone::{
    MethadoneConversionEngine, MethadoneConversionResult, MethadoneRequest,
};
use analgesia_knowledge::DrugKnowledgeBase;

use crate::error::EngineError;
use crate::outcome::{AssessmentOutcome, DripReport, PcaReport};

/// The assessment pipeline plus the dosing calculators, bound to one
/// knowledge base.
///
/// Every method is a pure function of its arguments and the knowledge base;
/// callers re-run [`ClinicalEngine::assess`] whenever the context changes.
pub struct ClinicalEngine {
    kb: Arc<DrugKnowledgeBase>,
    generator: RecommendationGenerator,
    gate: SafetyGateValidator,
    risk: RiskScoreCalculator,
    advisory: SafetyAdvisory,
    validator: ContextValidator,
    conversion: DoseConversionEngine,
    methadone: MethadoneConversionEngine,
}

impl ClinicalEngine {
    pub fn new(kb: Arc<DrugKnowledgeBase>) -> Self {
        tracing::info!(
            version = kb.version(),
            drugs = kb.drug_ids().count(),
            "clinical engine ready"
        );
        Self {
            conversion: DoseConversionEngine::new(Arc::clone(&kb)),
            kb,
            generator: RecommendationGenerator::new(),
            gate: SafetyGateValidator,
            risk: RiskScoreCalculator,
            advisory: SafetyAdvisory,
            validator: ContextValidator,
            methadone: MethadoneConversionEngine,
        }
    }

    /// Engine over the reference table compiled into the binary.
    pub fn bundled() -> Result<Self, EngineError> {
        Ok(Self::new(Arc::new(DrugKnowledgeBase::bundled()?)))
    }

    /// Engine over a reference table on disk.
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        Ok(Self::new(Arc::new(DrugKnowledgeBase::load(path)?)))
    }

    pub fn knowledge_base(&self) -> &DrugKnowledgeBase {
        &self.kb
    }

    /// Parse a context document and assess it.
    pub fn assess_json(&self, json: &str) -> Result<AssessmentOutcome, EngineError> {
        let ctx = PatientContext::from_json(json)?;
        Ok(self.assess(&ctx))
    }

    pub fn assess(&self, ctx: &PatientContext) -> AssessmentOutcome {
        let plan = self.generator.generate(ctx);

        let report = self.gate.validate(ctx, &plan.recommendations);
        let recommendations = report.apply(plan.recommendations);

        let risk = self.risk.assess(ctx);
        let advice = self.advisory.generate(ctx);

        let mut adjuvants = plan.adjuvants;
        for adjuvant in advice.adjuvants {
            if ctx.is_npo() && adjuvant.route.is_enteral() {
                continue;
            }
            if !adjuvants.iter().any(|a| same_agent(a, &adjuvant)) {
                adjuvants.push(adjuvant);
            }
        }

        let context_warnings = self.validator.validate(ctx, &adjuvants);

        let mut warnings = Vec::new();
        for warning in plan
            .warnings
            .into_iter()
            .chain(risk.warnings.iter().cloned())
            .chain(advice.warnings)
            .chain(context_warnings)
        {
            push_unique(&mut warnings, warning);
        }

        let mut monitoring_plan = Vec::new();
        for line in risk.monitoring_plan.iter().cloned().chain(advice.monitoring) {
            push_unique(&mut monitoring_plan, line);
        }

        tracing::debug!(
            recommendations = recommendations.len(),
            removed = report.removals.len(),
            warnings = warnings.len(),
            score = risk.score,
            "assessment complete"
        );

        AssessmentOutcome {
            recommendations,
            adjuvants,
            warnings,
            gate_failures: report.errors,
            risk,
            monitoring_plan,
        }
    }

    /// Aggregate MME across the entered regimen.
    pub fn total_mme(&self, entries: &[DoseEntry], ctx: &PatientContext) -> MmeSummary {
        self.conversion.aggregate(entries, &ConversionContext::from(ctx))
    }

    pub fn target_doses(
        &self,
        total_mme: f64,
        reduction_percent: f64,
        ctx: &PatientContext,
    ) -> Result<TargetDoseReport, EngineError> {
        Ok(self
            .conversion
            .target_doses(total_mme, reduction_percent, &ConversionContext::from(ctx))?)
    }

    pub fn methadone(&self, req: &MethadoneRequest) -> MethadoneConversionResult {
        self.methadone.calculate(req)
    }

    pub fn pca(&self, settings: &PcaSettings, ctx: &PatientContext) -> Result<PcaReport, EngineError> {
        Ok(PcaReport {
            limits: settings.limits()?,
            warnings: settings.validate(ctx),
        })
    }

    pub fn drip(&self, settings: &DripSettings, ctx: &PatientContext) -> Result<DripReport, EngineError> {
        Ok(DripReport {
            summary: settings.summarize(&self.kb)?,
            risk_multiplier: settings.risk_multiplier(ctx),
            warnings: settings.validate(ctx),
        })
    }
}

/// "Acetaminophen IV" and "Acetaminophen" are the same agent.
fn same_agent(a: &AdjuvantRecommendation, b: &AdjuvantRecommendation) -> bool {
    let first = |s: &str| s.split_whitespace().next().unwrap_or_default().to_string();
    first(&a.drug) == first(&b.drug)
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}
