use axum::{extract::State, routing::get, Json, Router};
use tracing::{error, instrument};

use crate::{error::ApiError, foods::repo_types::Food, state::AppState};

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/food", get(list_foods))
}

#[instrument(skip(state))]
pub async fn list_foods(State(state): State<AppState>) -> Result<Json<Vec<Food>>, ApiError> {
    let foods = Food::find_all(&state.db).await.map_err(|e| {
        error!(error = %e, "list foods failed");
        ApiError::Internal(e)
    })?;
    Ok(Json(foods))
}
