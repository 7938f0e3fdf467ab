//! Embedded static pages.
//!
//! The manual re-authorization helper is compiled into the binary; the only
//! dynamic piece is the authorization URL, substituted at request time.

const REFRESH_TOKENS_TEMPLATE: &str = include_str!("refresh_tokens.html");

/// Render the manual re-authorization page.
pub fn refresh_tokens_page(authorize_url: &str) -> String {
    REFRESH_TOKENS_TEMPLATE.replace("__AUTHORIZE_URL__", authorize_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_is_substituted() {
        let page = refresh_tokens_page("https://login.example.com/oauth/authorize?client_id=x");

        assert!(page.contains("https://login.example.com/oauth/authorize?client_id=x"));
        assert!(!page.contains("__AUTHORIZE_URL__"));
    }

    #[test]
    fn test_page_posts_to_exchange_endpoint() {
        let page = refresh_tokens_page("https://example.com");
        assert!(page.contains("/api/exchange-token"));
    }
}
