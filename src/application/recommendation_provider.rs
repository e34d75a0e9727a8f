// Port for the external AI recommendation service
use crate::domain::decision::{Decision, DiseaseRisk};
use crate::domain::farm::Farm;
use crate::domain::sensor::SensorSample;
use async_trait::async_trait;

/// Why a provider attempt failed. The split only drives log severity; both
/// variants take the same fallback path in the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rate limited: {0}")]
    RateLimited(String),
    #[error("provider unavailable: {0}")]
    Other(String),
}

#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Request an irrigation recommendation for the given reading and farm.
    /// Exactly one attempt; no internal retry or fallback.
    async fn recommend(&self, sample: &SensorSample, farm: &Farm)
        -> Result<Decision, ProviderError>;

    /// Assess fungal disease risk for the given reading and crop.
    async fn assess_disease_risk(
        &self,
        sample: &SensorSample,
        crop: &str,
    ) -> Result<DiseaseRisk, ProviderError>;
}
