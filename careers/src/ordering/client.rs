//! HTTP client for the owner-facing section endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::api::models::sections::{ReorderRequest, ReorderResponse, SectionResponse};
use crate::errors::ErrorBody;
use crate::types::CompanyId;

/// Header carrying the company's `sections_version` on the owner listing.
pub const SECTIONS_VERSION_HEADER: &str = "x-sections-version";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected a reorder because the listing it was based on is stale
    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("owner listing did not include a valid X-Sections-Version header")]
    MissingVersion,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// An owner listing together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerListing {
    pub sections: Vec<SectionResponse>,
    pub version: i64,
}

/// The two calls a [`SectionDraft`](super::draft::SectionDraft) needs to commit and reconcile.
#[async_trait]
pub trait SectionsApi: Send + Sync {
    async fn list_owner_sections(&self, company_id: CompanyId) -> Result<OwnerListing, ClientError>;

    async fn reorder(&self, request: &ReorderRequest) -> Result<ReorderResponse, ClientError>;
}

/// [`SectionsApi`] over HTTP with a bearer token.
pub struct SectionsApiReqwest {
    client: Client,
    base_url: Url,
    token: String,
    request_timeout: Duration,
}

impl SectionsApiReqwest {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// `base_url` is the service root, e.g. `https://careers.example.com/`.
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: Url, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: ensure_slash(&base_url),
            token: token.into(),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let path = format!("{}/", new_url.path());
        new_url.set_path(&path);
        new_url
    }
}

/// Turn a non-success response into a [`ClientError`], keeping the server's `error` message.
async fn error_from_response(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body).map(|b| b.error).unwrap_or(body);

    if status == StatusCode::CONFLICT {
        ClientError::Conflict { message }
    } else {
        ClientError::Status { status, message }
    }
}

#[async_trait]
impl SectionsApi for SectionsApiReqwest {
    #[instrument(skip(self), err)]
    async fn list_owner_sections(&self, company_id: CompanyId) -> Result<OwnerListing, ClientError> {
        let url = self.base_url.join(&format!("api/sections/company/{company_id}"))?;
        debug!("Fetching owner sections from {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let version = response
            .headers()
            .get(SECTIONS_VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or(ClientError::MissingVersion)?;
        let sections = response.json::<Vec<SectionResponse>>().await?;

        Ok(OwnerListing { sections, version })
    }

    #[instrument(skip(self, request), fields(count = request.sections.len()), err)]
    async fn reorder(&self, request: &ReorderRequest) -> Result<ReorderResponse, ClientError> {
        let url = self.base_url.join("api/sections/bulk/order")?;

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(request)
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json::<ReorderResponse>().await?)
    }
}
