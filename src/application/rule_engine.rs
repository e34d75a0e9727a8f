// Rule-based irrigation engine - deterministic fallback for the AI provider
use crate::domain::crop::CropThresholds;
use crate::domain::decision::{Action, Decision, DecisionSource, DiseaseRisk, RiskLevel, Urgency};
use crate::domain::sensor::{SensorSample, WeatherForecast};

/// Fixed run time applied under critical heat stress, in minutes.
const HEAT_STRESS_DURATION_MIN: u32 = 30;

/// Bounds for the deficit-based duration calculation, in minutes.
const MIN_DURATION_MIN: u32 = 15;
const MAX_DURATION_MIN: u32 = 60;

/// Evaluate sensor data against crop thresholds and return an irrigation
/// command. Pure and total: no I/O, no clock reads (`produced_at` comes from
/// the sample), never panics, and the first matching rule wins.
pub fn evaluate(
    sample: &SensorSample,
    thresholds: &CropThresholds,
    forecast: Option<&WeatherForecast>,
) -> Decision {
    let decision = |action, urgency, headline: &str, reason: String, duration| Decision {
        action,
        urgency,
        headline: headline.to_string(),
        reason,
        duration_minutes: duration,
        water_amount: None,
        produced_at: sample.observed_at,
        source: DecisionSource::Rule,
    };

    // 1. Critical safety rule: heat stress overrides everything else.
    if sample.temperature_c > 35.0 && sample.soil_moisture_pct < thresholds.min_moisture_pct {
        return decision(
            Action::Irrigate,
            Urgency::High,
            "Irrigate Immediately",
            "Critical heat stress detected.".to_string(),
            Some(HEAT_STRESS_DURATION_MIN),
        );
    }

    // 2. Standard irrigation rules.
    if sample.soil_moisture_pct < thresholds.min_moisture_pct {
        // Irrigating into high humidity promotes fungal disease, so the
        // humidity gate takes precedence over the plain deficit.
        if sample.humidity_pct > 80.0 {
            return decision(
                Action::Wait,
                Urgency::Medium,
                "Hold Irrigation",
                "High humidity detected. Irrigation postponed to prevent disease.".to_string(),
                None,
            );
        }

        if let Some(forecast) = forecast {
            if forecast.rain_probability_pct > 60.0 {
                return decision(
                    Action::Wait,
                    Urgency::Low,
                    "Rain Expected",
                    "Rain expected shortly.".to_string(),
                    None,
                );
            }
        }

        let deficit = thresholds.min_moisture_pct - sample.soil_moisture_pct;
        let duration = ((deficit * 1.5).round() as i64)
            .clamp(MIN_DURATION_MIN as i64, MAX_DURATION_MIN as i64) as u32;

        return decision(
            Action::Irrigate,
            Urgency::Medium,
            "Water Needed",
            format!(
                "Soil moisture ({:.0}%) is below target ({:.0}%).",
                sample.soil_moisture_pct, thresholds.min_moisture_pct
            ),
            Some(duration),
        );
    }

    // 3. Disease risk monitoring, only reached when moisture is adequate.
    if sample.humidity_pct > 85.0 && sample.temperature_c > 20.0 && sample.temperature_c < 30.0 {
        return decision(
            Action::MonitorDisease,
            Urgency::High,
            "Disease Watch",
            "Conditions favor fungal growth.".to_string(),
            None,
        );
    }

    decision(
        Action::Wait,
        Urgency::Low,
        "All Good",
        "Conditions are optimal.".to_string(),
        None,
    )
}

/// Rule-derived fungal risk, used when the AI provider cannot answer.
/// Mirrors the disease window of `evaluate` so the two never disagree.
pub fn disease_risk(sample: &SensorSample) -> DiseaseRisk {
    if sample.humidity_pct > 85.0 && sample.temperature_c > 20.0 && sample.temperature_c < 30.0 {
        DiseaseRisk {
            level: RiskLevel::High,
            explanation: "Warm, humid conditions favor fungal growth.".to_string(),
        }
    } else {
        DiseaseRisk {
            level: RiskLevel::Low,
            explanation: "Monitoring conditions.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(moisture: f64, temp: f64, humidity: f64) -> SensorSample {
        SensorSample {
            soil_moisture_pct: moisture,
            temperature_c: temp,
            humidity_pct: humidity,
            soil_ph: 6.8,
            observed_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_tomato_moisture_deficit_scenario() {
        // Tomato, moisture 35%, temp 28, humidity 50 -> irrigate 38 min.
        let thresholds = CropThresholds::for_crop("Tomato");
        let d = evaluate(&sample(35.0, 28.0, 50.0), &thresholds, None);

        assert_eq!(d.action, Action::Irrigate);
        assert_eq!(d.urgency, Urgency::Medium);
        assert_eq!(d.duration_minutes, Some(38));
        assert_eq!(d.source, DecisionSource::Rule);
        assert!(d.reason.contains("35%"));
        assert!(d.reason.contains("60%"));
    }

    #[test]
    fn test_olive_heat_stress_scenario() {
        // Olive, moisture 20%, temp 38, humidity 40 -> heat stress wins.
        let thresholds = CropThresholds::for_crop("Olive");
        let d = evaluate(&sample(20.0, 38.0, 40.0), &thresholds, None);

        assert_eq!(d.action, Action::Irrigate);
        assert_eq!(d.urgency, Urgency::High);
        assert_eq!(d.duration_minutes, Some(30));
    }

    #[test]
    fn test_strawberry_humidity_gate_scenario() {
        // Strawberry, moisture 50% (< 70), humidity 90 -> wait, not irrigate.
        let thresholds = CropThresholds::for_crop("Strawberry");
        let d = evaluate(&sample(50.0, 22.0, 90.0), &thresholds, None);

        assert_eq!(d.action, Action::Wait);
        assert_eq!(d.urgency, Urgency::Medium);
        assert_eq!(d.duration_minutes, None);
    }

    #[test]
    fn test_wheat_disease_window_scenario() {
        // Wheat, moisture 60% (adequate), temp 25, humidity 88.
        let thresholds = CropThresholds::for_crop("Wheat");
        let d = evaluate(&sample(60.0, 25.0, 88.0), &thresholds, None);

        assert_eq!(d.action, Action::MonitorDisease);
        assert_eq!(d.urgency, Urgency::High);
    }

    #[test]
    fn test_heat_stress_overrides_plain_deficit() {
        let thresholds = CropThresholds::for_crop("Tomato");
        let d = evaluate(&sample(10.0, 36.0, 30.0), &thresholds, None);

        // Deficit alone would compute a 60-minute run; heat stress pins 30.
        assert_eq!(d.urgency, Urgency::High);
        assert_eq!(d.duration_minutes, Some(30));
    }

    #[test]
    fn test_rain_forecast_postpones_irrigation() {
        let thresholds = CropThresholds::for_crop("Tomato");
        let forecast = WeatherForecast { rain_probability_pct: 75.0 };
        let d = evaluate(&sample(35.0, 28.0, 50.0), &thresholds, Some(&forecast));

        assert_eq!(d.action, Action::Wait);
        assert_eq!(d.urgency, Urgency::Low);
        assert_eq!(d.reason, "Rain expected shortly.");
    }

    #[test]
    fn test_low_rain_probability_does_not_postpone() {
        let thresholds = CropThresholds::for_crop("Tomato");
        let forecast = WeatherForecast { rain_probability_pct: 40.0 };
        let d = evaluate(&sample(35.0, 28.0, 50.0), &thresholds, Some(&forecast));

        assert_eq!(d.action, Action::Irrigate);
    }

    #[test]
    fn test_humidity_gate_beats_rain_forecast() {
        let thresholds = CropThresholds::for_crop("Tomato");
        let forecast = WeatherForecast { rain_probability_pct: 90.0 };
        let d = evaluate(&sample(35.0, 28.0, 85.0), &thresholds, Some(&forecast));

        assert_eq!(d.action, Action::Wait);
        assert_eq!(d.urgency, Urgency::Medium);
    }

    #[test]
    fn test_optimal_conditions_wait() {
        let thresholds = CropThresholds::for_crop("Tomato");
        let d = evaluate(&sample(70.0, 24.0, 55.0), &thresholds, None);

        assert_eq!(d.action, Action::Wait);
        assert_eq!(d.urgency, Urgency::Low);
        assert_eq!(d.reason, "Conditions are optimal.");
    }

    #[test]
    fn test_duration_is_always_within_bounds() {
        let thresholds = CropThresholds::for_crop("Strawberry");
        for moisture in 0..70 {
            let d = evaluate(&sample(moisture as f64, 28.0, 50.0), &thresholds, None);
            if let Some(minutes) = d.duration_minutes {
                assert!((15..=60).contains(&minutes), "duration {minutes} out of bounds");
            }
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let thresholds = CropThresholds::for_crop("Citrus");
        let s = sample(35.0, 28.0, 50.0);
        let first = evaluate(&s, &thresholds, None);
        let second = evaluate(&s, &thresholds, None);

        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_range_input_still_yields_a_decision() {
        // The evaluator trusts its input range but must never panic.
        let thresholds = CropThresholds::for_crop("Tomato");
        let d = evaluate(&sample(-20.0, 120.0, 300.0), &thresholds, None);
        assert_eq!(d.action, Action::Irrigate);
    }

    #[test]
    fn test_disease_risk_window() {
        assert_eq!(disease_risk(&sample(60.0, 25.0, 88.0)).level, RiskLevel::High);
        assert_eq!(disease_risk(&sample(60.0, 32.0, 88.0)).level, RiskLevel::Low);
        assert_eq!(disease_risk(&sample(60.0, 25.0, 70.0)).level, RiskLevel::Low);
    }
}
