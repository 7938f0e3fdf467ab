//! RFI listing and note-editing endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::errors::AppError;
use crate::models::{RfiListResponse, UpdateNoteRequest, UpdateNoteResponse};
use crate::AppState;

/// Header the UI sets on a post-refresh fetch to drop notes for RFIs that
/// disappeared from the snapshot.
pub const CLEANUP_NOTES_HEADER: &str = "x-cleanup-notes";

/// GET /api/rfis - Current snapshot with notes merged in.
pub async fn list_rfis(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RfiListResponse>, AppError> {
    let rows = state.store.load_rows().await?;

    let cleanup = headers
        .get(CLEANUP_NOTES_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    if cleanup {
        let pruned = state.store.prune_notes(&rows).await?;
        if pruned > 0 {
            tracing::info!("Pruned {} orphaned note(s)", pruned);
        }
    }

    Ok(Json(RfiListResponse { rows }))
}

/// PUT /api/rfis/{number}/note - Upsert the note for one RFI.
///
/// Last write wins; concurrent editors are not detected. An empty note
/// removes the entry.
pub async fn update_note(
    State(state): State<AppState>,
    Path(number): Path<String>,
    Json(request): Json<UpdateNoteRequest>,
) -> Result<Json<UpdateNoteResponse>, AppError> {
    let rows = state.store.load_rows().await?;
    if !rows.iter().any(|row| row.number == number) {
        return Err(AppError::NotFound(format!("RFI {} not found", number)));
    }

    state.store.save_note(&number, request.note.trim()).await?;

    Ok(Json(UpdateNoteResponse { success: true }))
}
