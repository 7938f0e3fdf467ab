//! Procore OAuth authorization-code exchange.
//!
//! Procore invalidates refresh tokens overnight, so re-authorization is a
//! routine manual flow: the user signs in, copies the code from the redirect
//! URL and pastes it into the helper page, which posts it here. The exchange
//! itself is a single request; a failed attempt is terminal and reported to
//! the caller.

use chrono::{Local, LocalResult, TimeZone, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::models::{OAuthTokenResponse, TokenBundle};

/// strftime format for user-facing timestamps ("Aug 24, 2026, 9:15 AM").
pub const HUMAN_TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %-I:%M %p";

/// Outcome of a single exchange attempt.
#[derive(Debug)]
pub enum ExchangeError {
    /// Upstream returned a non-success status; body is surfaced verbatim
    Upstream(String),
    /// Transport-level failure
    Network(String),
    /// Upstream 2xx with an unparseable body
    Parse(String),
}

impl std::fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExchangeError::Upstream(body) => write!(f, "Failed to exchange code: {body}"),
            ExchangeError::Network(msg) => write!(f, "Server error: {msg}"),
            ExchangeError::Parse(msg) => write!(f, "Server error: {msg}"),
        }
    }
}

impl std::error::Error for ExchangeError {}

/// Form body for the authorization-code grant.
#[derive(Debug, Serialize)]
struct ExchangeRequest<'a> {
    grant_type: &'static str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Client for the provider's token and authorize endpoints.
pub struct TokenExchanger {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    authorize_url: String,
    redirect_uri: String,
}

impl TokenExchanger {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url.clone(),
            authorize_url: config.authorize_url.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// URL the user visits to obtain a fresh authorization code.
    pub fn build_authorize_url(&self) -> String {
        format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchange an authorization code for a token bundle.
    ///
    /// Single attempt, no retries. Returns the bundle (with `obtained_at`
    /// set to now) and the formatted expiry of the new access token.
    pub async fn exchange_code(&self, code: &str) -> Result<(TokenBundle, String), ExchangeError> {
        let request = ExchangeRequest {
            grant_type: "authorization_code",
            code,
            redirect_uri: &self.redirect_uri,
        };

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&request)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Upstream(body));
        }

        let token: OAuthTokenResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::Parse(e.to_string()))?;

        let bundle = TokenBundle {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            obtained_at: Utc::now().timestamp(),
        };
        let expires_at = format_local_timestamp(token.created_at + token.expires_in);

        Ok((bundle, expires_at))
    }
}

/// Render a Unix timestamp as a human-readable local time.
pub fn format_local_timestamp(epoch: i64) -> String {
    match Local.timestamp_opt(epoch, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format(HUMAN_TIMESTAMP_FORMAT).to_string()
        }
        LocalResult::None => epoch.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_AUTHORIZE_URL, DEFAULT_REDIRECT_URI};

    fn exchanger() -> TokenExchanger {
        TokenExchanger {
            client: reqwest::Client::new(),
            client_id: "abc123".to_string(),
            client_secret: "shh".to_string(),
            token_url: "http://127.0.0.1:1/oauth/token".to_string(),
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }

    #[test]
    fn test_authorize_url_embeds_client_id_and_encoded_redirect() {
        let url = exchanger().build_authorize_url();

        assert!(url.starts_with(DEFAULT_AUTHORIZE_URL));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=abc123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
    }

    #[test]
    fn test_format_local_timestamp_is_nonempty() {
        let stamp = format_local_timestamp(1_756_000_000);
        assert!(!stamp.is_empty());
        assert!(stamp.contains(", 20"));
    }
}
