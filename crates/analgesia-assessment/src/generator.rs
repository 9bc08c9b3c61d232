//! Ordered axis pipeline producing the raw recommendation set.

use analgesia_core::models::patient::PatientContext;
use analgesia_core::models::recommendation::{AdjuvantRecommendation, DrugRecommendation};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::accumulator::Accumulator;
use crate::{Axis, all_axes};

/// Generator output before the safety gate has been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GeneratedPlan {
    pub recommendations: Vec<DrugRecommendation>,
    pub adjuvants: Vec<AdjuvantRecommendation>,
    pub warnings: Vec<String>,
}

pub struct RecommendationGenerator {
    axes: Vec<Box<dyn Axis>>,
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self { axes: all_axes() }
    }

    /// Run every axis in order over a fresh accumulator.
    pub fn generate(&self, ctx: &PatientContext) -> GeneratedPlan {
        let mut acc = Accumulator::new();
        for axis in &self.axes {
            axis.apply(ctx, &mut acc);
            tracing::debug!(
                axis = axis.name(),
                recommendations = acc.recommendations().len(),
                warnings = acc.warnings().len(),
                "axis applied"
            );
        }
        let (recommendations, adjuvants, warnings) = acc.into_parts();
        GeneratedPlan {
            recommendations,
            adjuvants,
            warnings,
        }
    }
}
