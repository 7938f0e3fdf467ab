//! Configuration module for the RFI Dashboard backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default Procore OAuth endpoints.
pub const DEFAULT_TOKEN_URL: &str = "https://login.procore.com/oauth/token";
pub const DEFAULT_AUTHORIZE_URL: &str = "https://login.procore.com/oauth/authorize";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Procore OAuth client id (public, embedded in the re-authorization page)
    pub client_id: String,
    /// Procore OAuth client secret
    pub client_secret: String,
    /// Pre-shared key required in the x-refresh-key header of POST /api/refresh
    pub refresh_key: Option<String>,
    /// Directory holding rfis.json, notes.json, tokens.json and last_refresh.txt
    pub data_dir: PathBuf,
    /// Shell command line that runs the external exporter
    pub exporter_cmd: String,
    /// OAuth token endpoint (overridable so tests can point at a local mock)
    pub token_url: String,
    /// OAuth authorize endpoint
    pub authorize_url: String,
    /// Redirect URI registered with the OAuth provider
    pub redirect_uri: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let client_id = env::var("PROCORE_CLIENT_ID").unwrap_or_default();
        let client_secret = env::var("PROCORE_CLIENT_SECRET").unwrap_or_default();

        let refresh_key = env::var("RFI_REFRESH_KEY").ok();

        let data_dir = env::var("RFI_DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let exporter_cmd =
            env::var("RFI_EXPORTER_CMD").unwrap_or_else(|_| "python3 export_rfis.py".to_string());

        let token_url =
            env::var("RFI_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string());

        let authorize_url =
            env::var("RFI_AUTHORIZE_URL").unwrap_or_else(|_| DEFAULT_AUTHORIZE_URL.to_string());

        let redirect_uri =
            env::var("RFI_REDIRECT_URI").unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        let bind_addr = env::var("RFI_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .expect("Invalid RFI_BIND_ADDR format");

        let log_level = env::var("RFI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            client_id,
            client_secret,
            refresh_key,
            data_dir,
            exporter_cmd,
            token_url,
            authorize_url,
            redirect_uri,
            bind_addr,
            log_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("PROCORE_CLIENT_ID");
        env::remove_var("PROCORE_CLIENT_SECRET");
        env::remove_var("RFI_REFRESH_KEY");
        env::remove_var("RFI_DATA_DIR");
        env::remove_var("RFI_EXPORTER_CMD");
        env::remove_var("RFI_TOKEN_URL");
        env::remove_var("RFI_AUTHORIZE_URL");
        env::remove_var("RFI_REDIRECT_URI");
        env::remove_var("RFI_BIND_ADDR");
        env::remove_var("RFI_LOG_LEVEL");

        let config = Config::from_env();

        assert!(config.refresh_key.is_none());
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.exporter_cmd, "python3 export_rfis.py");
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.authorize_url, DEFAULT_AUTHORIZE_URL);
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");
        assert_eq!(config.log_level, "info");
    }
}
