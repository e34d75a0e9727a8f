// Irrigation decision domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Irrigate,
    Wait,
    MonitorDisease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Which engine produced a decision. Callers never branch on this; it is
/// informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionSource {
    Rule,
    Ai,
}

/// One fully-formed irrigation decision. Each evaluation produces a fresh
/// value; the latest result replaces the previous one atomically, never a
/// field-by-field merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub urgency: Urgency,
    pub headline: String,
    pub reason: String,
    pub duration_minutes: Option<u32>,
    pub water_amount: Option<String>,
    pub produced_at: DateTime<Utc>,
    pub source: DecisionSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Fungal disease risk assessment for the current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseRisk {
    pub level: RiskLevel,
    pub explanation: String,
}
