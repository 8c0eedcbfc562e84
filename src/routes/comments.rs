use axum::{
    extract::{Path, Query, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{AppState, BearerToken, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::feed::{comment_count_after_add, comment_count_after_delete};
use crate::models::{
    AddCommentInput, Comment, CommentCreatedResponse, CommentDeletedResponse, DeleteCommentInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals/:id/comments", get(list_comments).post(add_comment))
        .route(
            "/deals/:id/comments/:comment_id",
            delete(delete_comment),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewCommentRequest {
    user_id: Uuid,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCommentRequest {
    user_id: Uuid,
}

async fn list_comments(
    State(state): State<AppState>,
    token: BearerToken,
    Path(deal_id): Path<String>,
) -> AppResult<Json<Vec<Comment>>> {
    let comments = state
        .backend
        .list_comments(&deal_id, token.as_deref())
        .await?;
    Ok(Json(comments))
}

async fn add_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
    Json(req): Json<NewCommentRequest>,
) -> AppResult<Json<CommentCreatedResponse>> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(AppError::BadRequest("Comment cannot be empty".to_string()));
    }

    let token = Some(current_user.token.as_str());
    let deal = state.backend.get_deal(&deal_id, token).await?;
    let comment = state
        .backend
        .add_comment(
            &deal_id,
            &AddCommentInput {
                user_id: req.user_id,
                content: content.to_string(),
            },
            token,
        )
        .await?;

    Ok(Json(CommentCreatedResponse {
        comment,
        comment_count: comment_count_after_add(deal.comment_count),
    }))
}

async fn delete_comment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((deal_id, comment_id)): Path<(String, String)>,
    Query(req): Query<DeleteCommentRequest>,
) -> AppResult<Json<CommentDeletedResponse>> {
    let token = Some(current_user.token.as_str());
    let deal = state.backend.get_deal(&deal_id, token).await?;
    state
        .backend
        .delete_comment(
            &comment_id,
            &DeleteCommentInput {
                user_id: req.user_id,
            },
            token,
        )
        .await?;

    Ok(Json(CommentDeletedResponse {
        comment_count: comment_count_after_delete(deal.comment_count),
    }))
}
