//! Exporter trigger and last-refresh contract types.

use serde::{Deserialize, Serialize};

/// Response body for POST /api/refresh.
///
/// Legacy browser contract: the UI inspects `stderr` for token-expiry
/// phrasing to decide whether to open the re-authorization page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefreshResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            stderr: None,
            error: None,
        }
    }

    pub fn failed(stderr: String) -> Self {
        Self {
            ok: false,
            stderr: Some(stderr),
            error: None,
        }
    }

    pub fn spawn_error(error: String) -> Self {
        Self {
            ok: false,
            stderr: None,
            error: Some(error),
        }
    }
}

/// Response body for GET /api/last-refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastRefreshResponse {
    #[serde(rename = "lastRefresh")]
    pub last_refresh: String,
}
