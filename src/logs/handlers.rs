use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{parse_date, DailyLog};
use crate::error::Error;
use crate::state::AppState;

use super::dto::{AddFoodRequest, RecentMeal};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/logs/:date", get(get_log))
        .route("/users/:user_id/meals/recent", get(recent_meals))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/logs/:date/foods", post(add_food))
}

/// A missing log is a normal state for a new user or a fresh day, so this
/// returns an empty log rather than a 404.
#[instrument(skip(state))]
pub async fn get_log(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> Result<Json<DailyLog>, Error> {
    let date = parse_date(&date)?;
    let log = state
        .store
        .get_daily_log(user_id, date)
        .await?
        .unwrap_or_else(|| DailyLog::empty(user_id, date));
    Ok(Json(log))
}

#[instrument(skip(state, body))]
pub async fn add_food(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
    Json(body): Json<AddFoodRequest>,
) -> Result<(StatusCode, Json<DailyLog>), Error> {
    let date = parse_date(&date)?;
    let log = services::add_food_to_log(
        state.store.as_ref(),
        user_id,
        date,
        body.food_id,
        body.serving_size,
        body.meal_type,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(state))]
pub async fn recent_meals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<RecentMeal>>, Error> {
    let meals = services::recent_meals(state.store.as_ref(), user_id).await?;
    Ok(Json(meals))
}
