use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::parse_date;
use crate::error::Error;
use crate::state::AppState;

use super::dto::NutritionSummary;
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/logs/:date/summary", get(get_summary))
}

/// "No data yet" is a normal state: an absent profile falls back to the
/// default goals and an absent log to zero totals, so a brand-new user
/// sees an all-zero summary instead of an error.
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> Result<Json<NutritionSummary>, Error> {
    let date = parse_date(&date)?;
    let goals = state
        .store
        .get_user_profile(user_id)
        .await?
        .map(|p| p.goals)
        .unwrap_or_default();
    let totals = state
        .store
        .get_daily_log(user_id, date)
        .await?
        .map(|l| l.totals)
        .unwrap_or_default();
    Ok(Json(services::summarize(&totals, &goals)?))
}
