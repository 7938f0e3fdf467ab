//! OAuth token exchange and manual re-authorization endpoints.

use axum::{extract::State, response::Html, Json};

use crate::models::{ExchangeTokenRequest, ExchangeTokenResponse};
use crate::pages;
use crate::AppState;

/// POST /api/exchange-token - Trade an authorization code for fresh tokens.
///
/// Always responds HTTP 200; the browser branches on `success`. A failed
/// exchange leaves the previous token bundle on disk untouched.
pub async fn exchange_token(
    State(state): State<AppState>,
    Json(request): Json<ExchangeTokenRequest>,
) -> Json<ExchangeTokenResponse> {
    let code = request.code.trim();
    if code.is_empty() {
        return Json(ExchangeTokenResponse::failure(
            "No authorization code provided",
        ));
    }

    let (bundle, expires_at) = match state.exchanger.exchange_code(code).await {
        Ok(exchanged) => exchanged,
        Err(e) => {
            tracing::warn!("Token exchange failed: {}", e);
            return Json(ExchangeTokenResponse::failure(e.to_string()));
        }
    };

    if let Err(e) = state.store.save_tokens(&bundle).await {
        tracing::error!("Failed to persist token bundle: {}", e);
        return Json(ExchangeTokenResponse::failure(format!(
            "Server error: {}",
            e.message()
        )));
    }

    tracing::info!("Token bundle refreshed; access token expires {}", expires_at);
    Json(ExchangeTokenResponse::ok(expires_at))
}

/// GET /api/refresh-tokens - Manual re-authorization helper page.
pub async fn refresh_tokens_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::refresh_tokens_page(
        &state.exchanger.build_authorize_url(),
    ))
}
