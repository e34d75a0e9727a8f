// Sensor reading domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One reading from a farm's sensor cluster. Produced fresh on every poll
/// tick and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSample {
    pub soil_moisture_pct: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub soil_ph: f64,
    pub observed_at: DateTime<Utc>,
}

impl SensorSample {
    /// Clip percentage fields to their plausible domain. Sensor sources
    /// sanitize readings with this before they reach the rule engine.
    pub fn clipped(mut self) -> Self {
        self.soil_moisture_pct = self.soil_moisture_pct.clamp(0.0, 100.0);
        self.humidity_pct = self.humidity_pct.clamp(0.0, 100.0);
        self
    }

    /// A reading a real sensor could plausibly produce.
    pub fn is_plausible(&self) -> bool {
        (0.0..=100.0).contains(&self.soil_moisture_pct)
            && (0.0..=100.0).contains(&self.humidity_pct)
            && (-50.0..=80.0).contains(&self.temperature_c)
            && (0.0..=14.0).contains(&self.soil_ph)
    }
}

/// External weather data, supplied only when available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherForecast {
    pub rain_probability_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(moisture: f64, humidity: f64) -> SensorSample {
        SensorSample {
            soil_moisture_pct: moisture,
            temperature_c: 25.0,
            humidity_pct: humidity,
            soil_ph: 6.8,
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_clipped_bounds_percentages() {
        let s = sample(105.0, -3.0).clipped();
        assert_eq!(s.soil_moisture_pct, 100.0);
        assert_eq!(s.humidity_pct, 0.0);

        let s = sample(42.0, 62.0).clipped();
        assert_eq!(s.soil_moisture_pct, 42.0);
        assert_eq!(s.humidity_pct, 62.0);
    }

    #[test]
    fn test_plausibility() {
        assert!(sample(42.0, 62.0).is_plausible());
        assert!(!sample(120.0, 62.0).is_plausible());

        let mut frozen = sample(42.0, 62.0);
        frozen.temperature_c = -80.0;
        assert!(!frozen.is_plausible());
    }
}
