use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{parse_date, AllergenAlert};
use crate::error::Error;
use crate::state::AppState;

use super::services;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/logs/:date/alerts", get(get_alerts))
}

#[instrument(skip(state))]
pub async fn get_alerts(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> Result<Json<Vec<AllergenAlert>>, Error> {
    let date = parse_date(&date)?;
    let alerts = services::compute_alerts(state.store.as_ref(), user_id, date).await?;
    Ok(Json(alerts))
}
