use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::io::{self, Write};
use tracing::warn;

const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";
const TOKEN_URL: &str = "https://api.trakt.tv/oauth/token";
const AUTHORIZE_URL: &str = "https://trakt.tv/oauth/authorize";

/// Client with browser-like headers; Trakt sits behind Cloudflare
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
}

#[derive(Debug)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<TokenResponse> for TokenInfo {
    fn from(token: TokenResponse) -> Self {
        // Two minutes of slack so a token never expires mid-run
        let expires_at = Utc::now() + Duration::seconds(token.expires_in as i64 - 120);
        Self {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
        }
    }
}

/// Refresh the saved grant if there is one, else run the interactive code flow
pub async fn authenticate(
    client_id: &str,
    client_secret: &str,
    refresh_token: Option<&str>,
) -> Result<TokenInfo> {
    let client = create_trakt_client();

    if let Some(refresh_token) = refresh_token {
        match exchange(&client, client_id, client_secret, "refresh_token", refresh_token).await {
            Ok(token_info) => return Ok(token_info),
            Err(e) => warn!(error = %e, "Trakt token refresh failed, starting a new authorization"),
        }
    }

    authorize_new(&client, client_id, client_secret).await
}

async fn authorize_new(client: &Client, client_id: &str, client_secret: &str) -> Result<TokenInfo> {
    let auth_url = format!(
        "{}?response_type=code&client_id={}&redirect_uri={}",
        AUTHORIZE_URL, client_id, REDIRECT_URI
    );

    println!("\nPlease visit the following URL to authorize this application:");
    println!("{}\n", auth_url);
    print!("Please enter the authorization code from the URL: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(anyhow!("Authorization code cannot be empty"));
    }

    exchange(client, client_id, client_secret, "authorization_code", code).await
}

async fn exchange(
    client: &Client,
    client_id: &str,
    client_secret: &str,
    grant_type: &str,
    grant: &str,
) -> Result<TokenInfo> {
    let grant_field = if grant_type == "refresh_token" { "refresh_token" } else { "code" };
    let mut payload = serde_json::json!({
        "client_id": client_id,
        "client_secret": client_secret,
        "redirect_uri": REDIRECT_URI,
        "grant_type": grant_type
    });
    payload[grant_field] = serde_json::Value::String(grant.to_string());

    let response = client
        .post(TOKEN_URL)
        .json(&payload)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("Trakt token exchange ({}) failed: {} - {}", grant_type, status, error_text));
    }

    let token: TokenResponse = response.json().await?;
    Ok(token.into())
}
