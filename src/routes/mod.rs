mod comments;
mod deals;
mod map;
mod reports;
mod saved;
mod votes;

use axum::Router;
use crate::auth::{AppState, BearerToken};
use crate::backend::BackendError;
use crate::models::SavedIds;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(deals::router())
        .merge(map::router())
        .merge(votes::router())
        .merge(comments::router())
        .merge(saved::router())
        .merge(reports::router())
}

/// Ids of the caller's saved deals, fetched only when the saved-only filter is on.
/// Anonymous callers have no saved deals.
async fn saved_ids(
    state: &AppState,
    token: &BearerToken,
    saved_only: bool,
) -> Result<SavedIds, BackendError> {
    match token.as_deref() {
        Some(token) if saved_only => {
            let deals = state.backend.list_saved_deals(Some(token)).await?;
            Ok(deals.iter().collect())
        }
        _ => Ok(SavedIds::default()),
    }
}
