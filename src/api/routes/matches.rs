use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{ByeRecord, MatchRecord, MatchSide, PlayerId};

#[derive(Debug, Deserialize)]
pub struct ReportMatchRequest {
    pub first: MatchSide,
    pub second: MatchSide,
}

#[derive(Debug, Deserialize)]
pub struct ReportByeRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct OpponentsResponse {
    pub opponents: BTreeMap<PlayerId, Vec<PlayerId>>,
}

pub async fn report_match(
    State(state): State<AppState>,
    Json(body): Json<ReportMatchRequest>,
) -> Result<(StatusCode, Json<MatchRecord>), ApiError> {
    let mut tournament = state.tournament.lock().await;
    let record = tournament.report_result(
        (body.first.player_id, body.first.result),
        (body.second.player_id, body.second.result),
    )?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete_matches(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut tournament = state.tournament.lock().await;
    tournament.delete_matches()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_bye(
    State(state): State<AppState>,
    Json(body): Json<ReportByeRequest>,
) -> Result<(StatusCode, Json<ByeRecord>), ApiError> {
    let mut tournament = state.tournament.lock().await;
    let bye = tournament.report_bye(body.player_id)?;
    Ok((StatusCode::CREATED, Json(bye)))
}

pub async fn list_opponents(
    State(state): State<AppState>,
) -> Result<Json<OpponentsResponse>, ApiError> {
    let tournament = state.tournament.lock().await;
    let opponents = tournament.player_matches()?;
    Ok(Json(OpponentsResponse { opponents }))
}
