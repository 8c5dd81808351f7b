use std::path::Path;

use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::ingest;
use crate::models::refresh::RefreshResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/refresh",
    tag = "Refresh",
    operation_id = "refreshData",
    summary = "Reload the sales export",
    description = "Re-reads the configured CSV export and applies it in a single transaction. Malformed rows are skipped. Products and customers are first-or-create; orders and items are always inserted, so re-applying an unchanged file fails with INTERNAL_ERROR and leaves the store untouched.",
    responses(
        (status = 200, description = "Refresh committed", body = RefreshResponse),
        (status = 500, description = "Source unreadable or storage failure; nothing was applied (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let csv_path = Path::new(&state.config.refresh.csv_path);
    let summary = ingest::refresh(&state.db, csv_path).await?;

    Ok(Json(RefreshResponse {
        message: "Data refreshed successfully.".into(),
        summary,
    }))
}
