// HTTP request handlers
use crate::domain::decision::{Decision, DiseaseRisk};
use crate::domain::farm::Farm;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct DecisionView {
    pub decision: Decision,
    pub disease_risk: Option<DiseaseRisk>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all configured farms
pub async fn list_farms(State(state): State<Arc<AppState>>) -> Json<Vec<Farm>> {
    let mut farms: Vec<Farm> = state
        .sessions
        .values()
        .map(|s| s.farm().clone())
        .collect();
    farms.sort_by(|a, b| a.id.cmp(&b.id));
    Json(farms)
}

/// Latest sensor vitals for a farm
pub async fn get_vitals(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&id) else {
        return (StatusCode::NOT_FOUND, "unknown farm").into_response();
    };

    match session.snapshot().await.vitals {
        Some(vitals) => Json(vitals).into_response(),
        // No reading yet; the first poll tick has not completed.
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Latest irrigation decision (with disease risk) for a farm
pub async fn get_decision(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&id) else {
        return (StatusCode::NOT_FOUND, "unknown farm").into_response();
    };

    let snapshot = session.snapshot().await;
    match snapshot.decision {
        Some(decision) => Json(DecisionView {
            decision,
            disease_risk: snapshot.disease_risk,
        })
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Recent decisions for a farm, most recent first
pub async fn get_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&id) else {
        return (StatusCode::NOT_FOUND, "unknown farm").into_response();
    };

    let history: Vec<Decision> = session.snapshot().await.history.into_iter().collect();
    Json(history).into_response()
}
