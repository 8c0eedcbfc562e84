use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AppState, CurrentUser};
use crate::error::{AppError, AppResult};
use crate::models::{AddReportInput, DeleteReportInput, Report};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/deals/:id/reports", get(list_reports).post(add_report))
        .route("/reports/:id", delete(delete_report))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewReportRequest {
    user_id: Uuid,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteReportRequest {
    user_id: Uuid,
}

async fn list_reports(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
) -> AppResult<Json<Vec<Report>>> {
    let reports = state
        .backend
        .list_reports(&deal_id, Some(&current_user.token))
        .await?;
    Ok(Json(reports))
}

async fn add_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(deal_id): Path<String>,
    Json(req): Json<NewReportRequest>,
) -> AppResult<(StatusCode, Json<Report>)> {
    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("Report reason is required".to_string()));
    }

    let report = state
        .backend
        .add_report(
            &deal_id,
            &AddReportInput {
                user_id: req.user_id,
                reason: reason.to_string(),
            },
            Some(&current_user.token),
        )
        .await?;
    info!("Deal {} reported", deal_id);

    Ok((StatusCode::CREATED, Json(report)))
}

async fn delete_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(report_id): Path<String>,
    Query(req): Query<DeleteReportRequest>,
) -> AppResult<StatusCode> {
    state
        .backend
        .delete_report(
            &report_id,
            &DeleteReportInput {
                user_id: req.user_id,
            },
            Some(&current_user.token),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
