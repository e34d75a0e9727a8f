// Simulated sensor feed - stands in for the real IoT ingestion path
use crate::application::clock::Clock;
use crate::application::sensor_source::SensorSource;
use crate::domain::sensor::SensorSample;
use async_trait::async_trait;
use std::sync::Arc;

// Baseline readings the simulation wobbles around.
const BASE_SOIL_MOISTURE_PCT: f64 = 42.0;
const BASE_TEMPERATURE_C: f64 = 28.0;
const BASE_HUMIDITY_PCT: f64 = 62.0;
const BASE_SOIL_PH: f64 = 6.8;

/// Produces plausible readings with slow sinusoidal drift so the vitals
/// look live. Deterministic for a given farm and instant, which keeps the
/// session tests reproducible. Output is clipped before it leaves here; the
/// rule engine never sees an out-of-domain value.
pub struct SimulatedSensorSource {
    clock: Arc<dyn Clock>,
}

impl SimulatedSensorSource {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    // Stable per-farm phase offset so co-located farms do not read in
    // lockstep.
    fn phase(farm_id: &str) -> f64 {
        let hash = farm_id
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)));
        (hash % 628) as f64 / 100.0
    }
}

#[async_trait]
impl SensorSource for SimulatedSensorSource {
    async fn fetch_latest(&self, farm_id: &str) -> anyhow::Result<SensorSample> {
        let observed_at = self.clock.now();
        let t = observed_at.timestamp() as f64;
        let phase = Self::phase(farm_id);

        let sample = SensorSample {
            soil_moisture_pct: BASE_SOIL_MOISTURE_PCT + 3.0 * (t / 300.0 + phase).sin(),
            temperature_c: BASE_TEMPERATURE_C + 1.0 * (t / 600.0 + phase).sin(),
            humidity_pct: BASE_HUMIDITY_PCT + 2.0 * (t / 450.0 + phase).cos(),
            soil_ph: BASE_SOIL_PH,
            observed_at,
        };

        Ok(sample.clipped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::SystemClock;

    #[tokio::test]
    async fn test_readings_stay_in_domain() {
        let source = SimulatedSensorSource::new(Arc::new(SystemClock));
        let sample = source.fetch_latest("frm_1").await.unwrap();

        assert!(sample.is_plausible());
        assert!((BASE_SOIL_MOISTURE_PCT - sample.soil_moisture_pct).abs() <= 3.0);
    }

    #[tokio::test]
    async fn test_farms_read_independently() {
        let source = SimulatedSensorSource::new(Arc::new(SystemClock));
        let a = source.fetch_latest("frm_1").await.unwrap();
        let b = source.fetch_latest("frm_2").await.unwrap();

        // Same instant, different phase.
        assert_ne!(a.soil_moisture_pct, b.soil_moisture_pct);
    }
}
