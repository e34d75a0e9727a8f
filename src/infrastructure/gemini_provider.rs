// Gemini recommendation provider - HTTP adapter for the AI service
use crate::application::recommendation_provider::{ProviderError, RecommendationProvider};
use crate::domain::decision::{
    Action, Decision, DecisionSource, DiseaseRisk, RiskLevel, Urgency,
};
use crate::domain::farm::Farm;
use crate::domain::sensor::SensorSample;
use crate::infrastructure::config::ProviderSettings;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// Minimal slice of the generateContent response envelope.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// The JSON document the model is instructed to emit for a recommendation.
/// Field deviations are rejected as a whole, never partially accepted.
#[derive(Debug, Deserialize)]
struct RawRecommendation {
    action: String,
    title: String,
    details: String,
    urgency: String,
    #[serde(rename = "waterAmount")]
    water_amount: Option<String>,
    duration: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawRisk {
    risk: String,
    explanation: String,
}

impl GeminiProvider {
    pub fn new(settings: &ProviderSettings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build provider HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }

    /// Send one prompt and return the model's raw text answer. Exactly one
    /// attempt; quota-style rejections classify as `RateLimited`.
    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Other(format!("transport failure: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), &text));
        }

        let envelope = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| ProviderError::Other(format!("malformed response envelope: {e}")))?;

        extract_text(envelope)
            .ok_or_else(|| ProviderError::Other("response contained no text part".to_string()))
    }

    fn recommendation_prompt(&self, sample: &SensorSample, farm: &Farm) -> String {
        format!(
            "You are an expert agronomist assistant for a farmer.\n\
             Analyze the following data and provide a concise, farmer-friendly recommendation.\n\n\
             Farm Context:\n\
             - Crop: {}\n\
             - Location: {}\n\n\
             Sensor Readings:\n\
             - Soil Moisture: {:.1}%\n\
             - Temperature: {:.1}C\n\
             - Humidity: {:.1}%\n\
             - pH: {:.1}\n\n\
             Output ONLY JSON in this format:\n\
             {{\n\
               \"action\": \"IRRIGATE\" | \"WAIT\" | \"MONITOR_DISEASE\",\n\
               \"title\": \"Short headline (e.g., Irrigate Today)\",\n\
               \"details\": \"Simple explanation (max 20 words)\",\n\
               \"urgency\": \"LOW\" | \"MEDIUM\" | \"HIGH\",\n\
               \"waterAmount\": \"Amount in Liters (optional)\",\n\
               \"duration\": \"Time in minutes (optional)\"\n\
             }}\n\n\
             Do not include markdown code blocks. Just the raw JSON string.",
            farm.crop,
            farm.location,
            sample.soil_moisture_pct,
            sample.temperature_c,
            sample.humidity_pct,
            sample.soil_ph,
        )
    }

    fn risk_prompt(&self, sample: &SensorSample, crop: &str) -> String {
        format!(
            "Assess fungal disease risk for {} based on:\n\
             Temp: {:.1}C, Humidity: {:.1}%.\n\
             Return JSON: {{ \"risk\": \"LOW\"|\"MEDIUM\"|\"HIGH\", \"explanation\": \"Max 10 words\" }}",
            crop, sample.temperature_c, sample.humidity_pct,
        )
    }
}

#[async_trait]
impl RecommendationProvider for GeminiProvider {
    async fn recommend(
        &self,
        sample: &SensorSample,
        farm: &Farm,
    ) -> Result<Decision, ProviderError> {
        let prompt = self.recommendation_prompt(sample, farm);
        let text = self.generate(prompt).await?;
        parse_recommendation(&text, sample.observed_at)
    }

    async fn assess_disease_risk(
        &self,
        sample: &SensorSample,
        crop: &str,
    ) -> Result<DiseaseRisk, ProviderError> {
        let prompt = self.risk_prompt(sample, crop);
        let text = self.generate(prompt).await?;
        parse_risk(&text)
    }
}

/// HTTP 429 and quota/exhaustion wording mean the quota is gone; everything
/// else is a generic provider failure.
fn classify_http_failure(status: u16, body: &str) -> ProviderError {
    let lowered = body.to_ascii_lowercase();
    if status == 429 || lowered.contains("quota") || lowered.contains("exceeded") {
        ProviderError::RateLimited(format!("status {status}"))
    } else {
        ProviderError::Other(format!("status {status}: {body}"))
    }
}

fn extract_text(envelope: GenerateResponse) -> Option<String> {
    envelope
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|p| p.text)
}

fn parse_recommendation(
    text: &str,
    observed_at: DateTime<Utc>,
) -> Result<Decision, ProviderError> {
    let raw: RawRecommendation = serde_json::from_str(text)
        .map_err(|e| ProviderError::Other(format!("malformed recommendation: {e}")))?;

    Ok(Decision {
        action: parse_action(&raw.action)?,
        urgency: parse_urgency(&raw.urgency)?,
        headline: raw.title,
        reason: raw.details,
        duration_minutes: parse_duration(raw.duration)?,
        water_amount: raw.water_amount,
        produced_at: observed_at,
        source: DecisionSource::Ai,
    })
}

fn parse_risk(text: &str) -> Result<DiseaseRisk, ProviderError> {
    let raw: RawRisk = serde_json::from_str(text)
        .map_err(|e| ProviderError::Other(format!("malformed risk assessment: {e}")))?;

    let level = match raw.risk.as_str() {
        "LOW" => RiskLevel::Low,
        "MEDIUM" => RiskLevel::Medium,
        "HIGH" => RiskLevel::High,
        other => {
            return Err(ProviderError::Other(format!("unknown risk level: {other}")));
        }
    };

    Ok(DiseaseRisk {
        level,
        explanation: raw.explanation,
    })
}

fn parse_action(value: &str) -> Result<Action, ProviderError> {
    match value {
        "IRRIGATE" => Ok(Action::Irrigate),
        "WAIT" => Ok(Action::Wait),
        "MONITOR_DISEASE" => Ok(Action::MonitorDisease),
        other => Err(ProviderError::Other(format!("unknown action: {other}"))),
    }
}

fn parse_urgency(value: &str) -> Result<Urgency, ProviderError> {
    match value {
        "LOW" => Ok(Urgency::Low),
        "MEDIUM" => Ok(Urgency::Medium),
        "HIGH" => Ok(Urgency::High),
        other => Err(ProviderError::Other(format!("unknown urgency: {other}"))),
    }
}

/// The model sends duration as a bare number or as text like "20 mins".
/// Absent is fine; present but unreadable is a shape deviation.
fn parse_duration(value: Option<serde_json::Value>) -> Result<Option<u32>, ProviderError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ProviderError::Other(format!("unusable duration: {n}"))),
        serde_json::Value::String(s) => {
            let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits
                .parse::<u32>()
                .map(Some)
                .map_err(|_| ProviderError::Other(format!("unusable duration: {s:?}")))
        }
        other => Err(ProviderError::Other(format!("unusable duration: {other}"))),
    }
}
