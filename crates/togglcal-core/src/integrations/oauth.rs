//! OAuth2 Authorization Code flow for a desktop CLI.
//!
//! 1. Opens the browser to the authorization URL
//! 2. Starts a tiny localhost HTTP server to receive the callback
//! 3. Exchanges the code for an access token (+ refresh token)
//! 4. Stores tokens in the OS keyring

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpListener;

use super::keyring_store;
use crate::error::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp of expiry, when the service reported one.
    pub expires_at: Option<i64>,
    pub token_type: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Keyring key the tokens are stored under.
    pub service_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
}

impl OAuthConfig {
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn auth_url_full(&self) -> String {
        let scopes = self.scopes.join(" ");
        let mut url = url::Url::parse(&self.auth_url).expect("static auth url");
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri())
            .append_pair("response_type", "code")
            .append_pair("scope", &scopes)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        url.into()
    }
}

/// Run the full flow: open browser -> listen for callback -> exchange code.
pub async fn authorize(config: &OAuthConfig) -> Result<OAuthTokens, AuthError> {
    let auth_url = config.auth_url_full();
    open::that(&auth_url).map_err(|e| AuthError::AuthorizationFailed(e.to_string()))?;

    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.redirect_port))
        .map_err(|e| AuthError::AuthorizationFailed(e.to_string()))?;

    let (mut stream, _) = listener
        .accept()
        .map_err(|e| AuthError::AuthorizationFailed(e.to_string()))?;
    let mut buf = [0u8; 4096];
    let n = stream
        .read(&mut buf)
        .map_err(|e| AuthError::InvalidCallback(e.to_string()))?;
    let request = String::from_utf8_lossy(&buf[..n]);

    let code = extract_code(&request)
        .ok_or_else(|| AuthError::InvalidCallback("no code in callback".into()))?;

    let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Authentication successful!</h2><p>You can close this tab.</p></body></html>";
    let _ = stream.write_all(response.as_bytes());
    drop(stream);
    drop(listener);

    let tokens = exchange_code(config, &code).await?;

    let tokens_json = serde_json::to_string(&tokens)
        .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;
    keyring_store::set(&config.service_name, &tokens_json)?;

    Ok(tokens)
}

/// Exchange an authorization code for tokens.
async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<OAuthTokens, AuthError> {
    let client = Client::new();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", &config.redirect_uri()),
    ];

    let resp = client
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| AuthError::TokenExchangeFailed(e.to_string()))?;

    if let Some(error) = body.get("error") {
        return Err(AuthError::TokenExchangeFailed(error.to_string()));
    }

    Ok(parse_tokens(&body, None))
}

/// Refresh an access token using a refresh token, persisting the result.
pub async fn refresh_token(config: &OAuthConfig, refresh: &str) -> Result<OAuthTokens, AuthError> {
    let client = Client::new();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh),
        ("grant_type", "refresh_token"),
    ];

    let resp = client
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

    let body: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;

    if let Some(error) = body.get("error") {
        return Err(AuthError::TokenRefreshFailed(error.to_string()));
    }

    let tokens = parse_tokens(&body, Some(refresh));

    let tokens_json = serde_json::to_string(&tokens)
        .map_err(|e| AuthError::TokenRefreshFailed(e.to_string()))?;
    keyring_store::set(&config.service_name, &tokens_json)?;

    Ok(tokens)
}

fn parse_tokens(body: &serde_json::Value, fallback_refresh: Option<&str>) -> OAuthTokens {
    let expires_in = body.get("expires_in").and_then(|v| v.as_i64());
    let expires_at = expires_in.map(|ei| chrono::Utc::now().timestamp() + ei);

    OAuthTokens {
        access_token: body["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: body
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(String::from)
            .or_else(|| fallback_refresh.map(String::from)),
        expires_at,
        token_type: body["token_type"].as_str().unwrap_or("Bearer").to_string(),
        scope: body.get("scope").and_then(|v| v.as_str()).map(String::from),
    }
}

/// Load stored tokens from the keyring.
pub fn load_tokens(service_name: &str) -> Option<OAuthTokens> {
    keyring_store::get(service_name)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str(&json).ok())
}

/// Whether stored tokens are expired (with a 60s buffer).
pub fn is_expired(tokens: &OAuthTokens) -> bool {
    match tokens.expires_at {
        Some(exp) => chrono::Utc::now().timestamp() > exp - 60,
        None => false,
    }
}

fn extract_code(request: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_from_callback() {
        let request = "GET /callback?code=abc123&scope=calendar HTTP/1.1\r\nHost: localhost\r\n";
        assert_eq!(extract_code(request), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_code_missing() {
        let request = "GET /callback?error=access_denied HTTP/1.1\r\n";
        assert_eq!(extract_code(request), None);
    }

    #[test]
    fn test_auth_url_includes_offline_access() {
        let config = OAuthConfig {
            service_name: "google".into(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token_url: "https://oauth2.googleapis.com/token".into(),
            scopes: vec!["https://www.googleapis.com/auth/calendar".into()],
            redirect_port: 19822,
        };
        let url = config.auth_url_full();
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("client_id=cid"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A19822%2Fcallback"));
    }

    #[test]
    fn test_is_expired_honors_buffer() {
        let fresh = OAuthTokens {
            access_token: "a".into(),
            refresh_token: None,
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
            token_type: "Bearer".into(),
            scope: None,
        };
        assert!(!is_expired(&fresh));

        let stale = OAuthTokens {
            expires_at: Some(chrono::Utc::now().timestamp() + 30),
            ..fresh.clone()
        };
        assert!(is_expired(&stale));
    }

    #[test]
    fn test_parse_tokens_keeps_old_refresh_token() {
        let body = serde_json::json!({
            "access_token": "new-access",
            "token_type": "Bearer",
            "expires_in": 3599
        });
        let tokens = parse_tokens(&body, Some("old-refresh"));
        assert_eq!(tokens.access_token, "new-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("old-refresh"));
        assert!(tokens.expires_at.is_some());
    }
}
