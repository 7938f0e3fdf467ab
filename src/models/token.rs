//! Token bundle and OAuth exchange contract types.

use serde::{Deserialize, Serialize};

/// Persisted token bundle.
///
/// Singleton, stored as a flat JSON file and fully overwritten on each
/// successful exchange. The file is shared with the external exporter, which
/// reads it for its own Procore calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds at the time of the exchange
    pub obtained_at: i64,
}

/// Request body for POST /api/exchange-token.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeTokenRequest {
    #[serde(default)]
    pub code: String,
}

/// Response body for POST /api/exchange-token.
///
/// Always HTTP 200; the browser branches on `success`. This shape predates
/// the error envelope and is kept verbatim for the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeTokenResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl ExchangeTokenResponse {
    pub fn ok(expires_at: String) -> Self {
        Self {
            success: true,
            message: Some("Tokens refreshed successfully".to_string()),
            error: None,
            expires_at: Some(expires_at),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            expires_at: None,
        }
    }
}

/// Successful token response from the OAuth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Provider-side issue time, Unix seconds
    pub created_at: i64,
    /// Lifetime in seconds from `created_at`
    pub expires_in: i64,
}
