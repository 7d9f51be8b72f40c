//! HTTP proxy store for delegation mode.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::errors::StoreError;
use crate::models::{NewResolution, ResolutionRequest};
use crate::store::{ResolutionStore, SERVICE_IDENTIFIER};

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[allow(dead_code)]
    status: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct AddBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApproveBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// A [`ResolutionStore`] that forwards every operation to the REST surface
/// of a peer instance.
///
/// The proxy holds no request collection of its own. The peer is the single
/// authority: proposals land there, the peer's reviewer decides them, and
/// the peer's working tree takes the side effects.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteStore {
    /// Connect to a peer and verify it is actually this service.
    ///
    /// Probes `GET /api/health` and refuses anything that does not report
    /// the expected identifier, so a URL pointing at some unrelated HTTP
    /// server fails here rather than corrupting a review queue later.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self, StoreError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("mergegate/0.1"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build reqwest client");

        let store = Self { http, base_url };
        let health: HealthBody = store
            .http
            .get(store.url("/api/health"))
            .send()
            .await?
            .json()
            .await?;
        if health.identifier != SERVICE_IDENTIFIER {
            return Err(StoreError::Delegation(format!(
                "peer at {} identified itself as '{}', expected '{}'",
                store.base_url, health.identifier, SERVICE_IDENTIFIER
            )));
        }

        info!(peer = %store.base_url, "delegating resolution store to remote peer");
        Ok(store)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Translate a non-2xx peer response into the matching store error.
    async fn check(resp: reqwest::Response, id: Option<&str>) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("peer returned HTTP {status}"));

        match status {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(
                id.unwrap_or("unknown").to_string(),
            )),
            StatusCode::BAD_REQUEST => Err(StoreError::Validation(message)),
            _ => Err(StoreError::Delegation(message)),
        }
    }
}

#[async_trait::async_trait]
impl ResolutionStore for RemoteStore {
    #[instrument(skip(self, new), fields(file = %new.file_path))]
    async fn propose(&self, new: NewResolution) -> Result<String, StoreError> {
        let resp = self
            .http
            .post(self.url("/api/add"))
            .json(&new)
            .send()
            .await?;
        let body: AddBody = Self::check(resp, None).await?.json().await?;
        debug!(id = %body.id, "proposal forwarded to peer");
        Ok(body.id)
    }

    async fn list(&self) -> Result<Vec<ResolutionRequest>, StoreError> {
        let resp = self.http.get(self.url("/api/pending")).send().await?;
        let pending: Vec<ResolutionRequest> = Self::check(resp, None).await?.json().await?;
        Ok(pending)
    }

    // The peer surface has no per-id GET, so a read is a list plus a find.
    async fn read(&self, id: &str) -> Result<ResolutionRequest, StoreError> {
        self.list()
            .await?
            .into_iter()
            .find(|request| request.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, content: &str) -> Result<(), StoreError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/save/{id}")))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?;
        Self::check(resp, Some(id)).await?;
        Ok(())
    }

    #[instrument(skip(self, comment))]
    async fn approve(&self, id: &str, comment: Option<&str>) -> Result<String, StoreError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/approve/{id}")))
            .json(&serde_json::json!({ "comment": comment }))
            .send()
            .await?;
        let body: ApproveBody = Self::check(resp, Some(id)).await?.json().await?;
        Ok(body.message)
    }

    #[instrument(skip(self, comment))]
    async fn reject(&self, id: &str, comment: Option<&str>) -> Result<(), StoreError> {
        let resp = self
            .http
            .post(self.url(&format!("/api/reject/{id}")))
            .json(&serde_json::json!({ "comment": comment }))
            .send()
            .await?;
        Self::check(resp, Some(id)).await?;
        Ok(())
    }
}
