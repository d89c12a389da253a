use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::RoundPlan;

/// Pair the next round. A POST because an odd field records a bye.
pub async fn pair_round(State(state): State<AppState>) -> Result<Json<RoundPlan>, ApiError> {
    let mut tournament = state.tournament.lock().await;
    let plan = tournament.plan_round()?;
    Ok(Json(plan))
}
