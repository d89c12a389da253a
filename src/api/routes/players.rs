use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::Player;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerCountResponse {
    pub count: usize,
}

pub async fn register_player(
    State(state): State<AppState>,
    Json(body): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let mut tournament = state.tournament.lock().await;
    let player = tournament.register_player(&body.name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn count_players(
    State(state): State<AppState>,
) -> Result<Json<PlayerCountResponse>, ApiError> {
    let tournament = state.tournament.lock().await;
    let count = tournament.count_players()?;
    Ok(Json(PlayerCountResponse { count }))
}

pub async fn delete_players(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let mut tournament = state.tournament.lock().await;
    tournament.delete_players()?;
    Ok(StatusCode::NO_CONTENT)
}
