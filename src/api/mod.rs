pub mod pokemon;
pub mod types;

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not found: {url}")]
    NotFound { url: String },
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

/// Coarse classification used by the synchronizers and the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not complete, or the service answered with a
    /// non-404 error status.
    Network,
    /// The service reported that the item or category does not exist.
    NotFound,
    /// The body did not have the expected shape.
    Malformed,
}

impl ApiClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::ApiError { .. } => ErrorKind::Network,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Deserialize(_) => ErrorKind::Malformed,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog seam
// ---------------------------------------------------------------------------

/// Anything that can answer GET requests against the catalog with JSON.
///
/// [`PokeApiClient`] talks to the real service; tests use an in-memory
/// implementation that can delay or fail individual URLs.
pub trait Catalog: Send + Sync {
    /// Root of the catalog API, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Issue a GET against an absolute URL and deserialize the body.
    fn get_json<T>(&self, url: &str) -> impl Future<Output = Result<T, ApiClientError>> + Send
    where
        T: DeserializeOwned + Send;
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

const USER_AGENT: &str = concat!("pokedex-tui/", env!("CARGO_PKG_VERSION"));

pub struct PokeApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check status and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &str,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let status = resp.status();
        tracing::debug!(%url, status = status.as_u16(), "catalog response");

        if status == StatusCode::NOT_FOUND {
            return Err(ApiClientError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ApiClientError::Deserialize(format!("{e}")))
    }
}

impl Catalog for PokeApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, ApiClientError>
    where
        T: DeserializeOwned + Send,
    {
        tracing::debug!(%url, "GET");
        let resp = self.http_client.get(url).send().await?;
        self.handle_response(url, resp).await
    }
}
