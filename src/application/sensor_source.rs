// Port for the sensor data feed
use crate::domain::sensor::SensorSample;
use async_trait::async_trait;

/// A sensor reading outside the plausible physical domain. Sources must clip
/// or reject readings before they reach the rule engine.
#[derive(Debug, thiserror::Error)]
#[error("implausible sensor reading for farm {farm_id}: {detail}")]
pub struct InvalidSample {
    pub farm_id: String,
    pub detail: String,
}

#[async_trait]
pub trait SensorSource: Send + Sync {
    /// Fetch the most recent reading for a farm. Failures are transient; the
    /// polling controller keeps the previous vitals for that tick.
    async fn fetch_latest(&self, farm_id: &str) -> anyhow::Result<SensorSample>;
}
