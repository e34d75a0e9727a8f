// Decision orchestrator - blends the AI provider with the rule fallback
use crate::application::recommendation_provider::{ProviderError, RecommendationProvider};
use crate::application::rule_engine;
use crate::domain::crop::CropThresholds;
use crate::domain::decision::{Decision, DiseaseRisk};
use crate::domain::farm::Farm;
use crate::domain::sensor::SensorSample;
use std::sync::Arc;

#[derive(Clone)]
pub struct DecisionOrchestrator {
    provider: Arc<dyn RecommendationProvider>,
}

impl DecisionOrchestrator {
    pub fn new(provider: Arc<dyn RecommendationProvider>) -> Self {
        Self { provider }
    }

    /// Produce a decision for the given reading. Never fails: one provider
    /// attempt, and any failure falls back to the rule engine on the same
    /// sample. The fallback is fully populated and indistinguishable in
    /// shape from a native rule evaluation; only `source` differs.
    pub async fn decide(&self, sample: &SensorSample, farm: &Farm) -> Decision {
        match self.provider.recommend(sample, farm).await {
            Ok(decision) => decision,
            Err(e) => {
                self.log_provider_failure(&e, &farm.id);
                let thresholds = CropThresholds::for_crop(&farm.crop);
                rule_engine::evaluate(sample, &thresholds, None)
            }
        }
    }

    /// Disease risk for the current conditions, with a rule-derived answer
    /// when the provider cannot respond.
    pub async fn disease_risk(&self, sample: &SensorSample, farm: &Farm) -> DiseaseRisk {
        match self.provider.assess_disease_risk(sample, &farm.crop).await {
            Ok(risk) => risk,
            Err(e) => {
                self.log_provider_failure(&e, &farm.id);
                rule_engine::disease_risk(sample)
            }
        }
    }

    fn log_provider_failure(&self, e: &ProviderError, farm_id: &str) {
        match e {
            ProviderError::RateLimited(_) => {
                tracing::warn!(farm_id, "AI quota exhausted, using rule fallback: {e}");
            }
            ProviderError::Other(_) => {
                tracing::error!(farm_id, "AI provider failed, using rule fallback: {e}");
            }
        }
    }
}
