use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::FoodItem;
use crate::error::Error;
use crate::state::AppState;

use super::dto::SearchParams;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(search_foods))
        .route("/foods/:id", get(get_food))
}

#[instrument(skip(state))]
pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<FoodItem>>, Error> {
    let query = params.query.trim();
    // An empty query would match the whole catalog; return nothing instead.
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let foods = state.store.search_food_items(query).await?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FoodItem>, Error> {
    state
        .store
        .get_food_item(id)
        .await?
        .map(Json)
        .ok_or(Error::NotFound("food"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_query_returns_nothing() {
        let state = AppState::fixture();
        let Json(foods) = search_foods(
            State(state),
            Query(SearchParams { query: "   ".into() }),
        )
        .await
        .expect("search");
        assert!(foods.is_empty());
    }

    #[tokio::test]
    async fn unknown_food_is_not_found() {
        let state = AppState::fixture();
        let err = get_food(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
