//! IGDB API client.
//!
//! Async HTTP client using `reqwest`. Covers the three calls the cover
//! pipeline needs: the Twitch OAuth token exchange, the game search, and the
//! image CDN download. Every request is bounded by the configured timeout.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};

use crate::types::{Game, TokenResponse};

pub const DEFAULT_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";
pub const DEFAULT_API_URL: &str = "https://api.igdb.com/v4";
pub const DEFAULT_IMAGE_URL: &str = "https://images.igdb.com/igdb/image/upload";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum number of candidates requested per search.
pub const SEARCH_LIMIT: usize = 5;

/// Errors from the IGDB client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid client id")]
    InvalidClientId,

    #[error("token endpoint returned an empty token")]
    EmptyToken,
}

impl Error {
    /// True when the request never got a response (connect, timeout, TLS).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

/// Credentials and endpoints for IGDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgdbConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    /// API base, without the `/games` suffix.
    pub api_url: String,
    /// Image CDN base, without the size segment.
    pub image_url: String,
    pub timeout: Duration,
}

impl IgdbConfig {
    /// Creates a config for the public endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            api_url: DEFAULT_API_URL.into(),
            image_url: DEFAULT_IMAGE_URL.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Points every endpoint at `base` (mock servers, proxies).
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.token_url = format!("{base}/oauth2/token");
        self.api_url = format!("{base}/v4");
        self.image_url = format!("{base}/igdb/image/upload");
        self
    }
}

/// IGDB API client.
pub struct Client {
    http: reqwest::Client,
    config: IgdbConfig,
}

impl Client {
    /// Creates a new client for the given configuration.
    pub fn new(config: IgdbConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("modninja/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &IgdbConfig {
        &self.config
    }

    /// Exchanges the client credentials for a bearer token.
    pub async fn fetch_token(&self) -> Result<TokenResponse, Error> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let resp = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await?;

        let body = check_status(resp).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Searches games by name, returning up to [`SEARCH_LIMIT`] candidates.
    pub async fn search_games(&self, token: &str, term: &str) -> Result<Vec<Game>, Error> {
        let client_id =
            HeaderValue::from_str(&self.config.client_id).map_err(|_| Error::InvalidClientId)?;

        let resp = self
            .http
            .post(format!("{}/games", self.config.api_url))
            .header("Client-ID", client_id)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(CONTENT_TYPE, "text/plain")
            .body(search_query(term))
            .send()
            .await?;

        let body = check_status(resp).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Returns the CDN URL of a cover image.
    pub fn cover_url(&self, image_id: &str) -> String {
        format!("{}/t_cover_big/{image_id}.jpg", self.config.image_url)
    }

    /// Downloads a cover image.
    pub async fn download_cover(&self, image_id: &str) -> Result<Vec<u8>, Error> {
        let resp = self.http.get(self.cover_url(image_id)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: "download failed".into(),
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<Vec<u8>, Error> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Builds the IGDB query body for a name search.
fn search_query(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('"', "\\\"");
    format!("fields cover.image_id,name; search \"{escaped}\"; limit {SEARCH_LIMIT};")
}
