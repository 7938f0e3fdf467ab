//! Exporter trigger and last-refresh endpoints.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::AppError;
use crate::exporter::RunOutcome;
use crate::models::{LastRefreshResponse, RefreshResponse};
use crate::oauth::format_local_timestamp;
use crate::AppState;

/// POST /api/refresh - Run the external exporter and record the refresh time.
///
/// Guarded by the x-refresh-key middleware. The request waits for the
/// exporter to finish; failures are terminal and reported in the body.
pub async fn run_exporter(State(state): State<AppState>) -> Json<RefreshResponse> {
    match state.exporter.run().await {
        RunOutcome::Success { .. } => {
            let stamp = format_local_timestamp(Utc::now().timestamp());
            if let Err(e) = state.store.save_last_refresh(&stamp).await {
                // The export itself succeeded; a lost timestamp is not worth failing over
                tracing::warn!("Failed to record last-refresh timestamp: {}", e);
            }
            Json(RefreshResponse::ok())
        }
        RunOutcome::Failed { stderr } => Json(RefreshResponse::failed(stderr)),
        RunOutcome::SpawnError(error) => Json(RefreshResponse::spawn_error(error)),
    }
}

/// GET /api/last-refresh - Timestamp of the last successful exporter run.
pub async fn last_refresh(
    State(state): State<AppState>,
) -> Result<Json<LastRefreshResponse>, AppError> {
    match state.store.load_last_refresh().await? {
        Some(last_refresh) => Ok(Json(LastRefreshResponse { last_refresh })),
        None => Err(AppError::NotFound(
            "No refresh has completed yet".to_string(),
        )),
    }
}
