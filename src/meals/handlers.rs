use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MealDto, MealListQuery},
    repo_types::Meal,
    services,
};
use crate::{
    error::{json_body, ApiError},
    pagination::Page,
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/Meals", get(list_meals).post(create_meal))
        .route(
            "/Meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meal>, ApiError> {
    let meal = services::find_by_id(&state.db, &id).await?;
    Ok(Json(meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Query(params): Query<MealListQuery>,
) -> Result<Json<Page<Meal>>, ApiError> {
    let page = services::find_meals_by_name(&state.db, &params).await?;
    Ok(Json(page))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    payload: Result<Json<MealDto>, JsonRejection>,
) -> Result<Json<Meal>, ApiError> {
    let dto = json_body(payload)?;
    let meal = services::create_meal(&state.db, dto).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MealDto>, JsonRejection>,
) -> Result<Json<Meal>, ApiError> {
    let dto = json_body(payload)?;
    let meal = services::update_meal(&state.db, &id, dto).await?;
    Ok(Json(meal))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meal>, ApiError> {
    let meal = services::delete_meal(&state.db, &id).await?;
    Ok(Json(meal))
}
