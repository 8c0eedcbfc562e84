use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::auth::{AppState, CurrentUser};
use crate::error::AppResult;
use crate::models::Deal;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/saved", get(list_saved))
        .route("/saved/:id", post(save_deal).delete(unsave_deal))
}

async fn list_saved(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Deal>>> {
    let deals = state
        .backend
        .list_saved_deals(Some(&current_user.token))
        .await?;
    Ok(Json(deals))
}

async fn save_deal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .backend
        .save_deal(&deal_id, Some(&current_user.token))
        .await?;
    Ok(StatusCode::CREATED)
}

async fn unsave_deal(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .backend
        .unsave_deal(&deal_id, Some(&current_user.token))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
