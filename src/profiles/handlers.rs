use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{AllergenSensitivity, UserProfile};
use crate::error::Error;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/profile", get(get_profile))
        .route("/users/:user_id/allergens", get(get_allergens))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, Error> {
    state
        .store
        .get_user_profile(user_id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("user"))
}

/// The sensitivity list alone; an unknown user simply has none.
#[instrument(skip(state))]
pub async fn get_allergens(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<AllergenSensitivity>>, Error> {
    let allergens = state
        .store
        .get_user_profile(user_id)
        .await?
        .map(|p| p.allergens)
        .unwrap_or_default();
    Ok(Json(allergens))
}
