//! PostgREST-style client for the feature table.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use super::classify::{classify_curl_error, classify_http_status};
use super::error::{ErrorKind, RemoteError};
use super::http::{self, HttpRequest, HttpResponse, Method};
use super::FeatureStore;
use crate::config::RemoteSettings;
use crate::feature::{Feature, FeatureId, FeaturePatch, NewFeature};

/// Which call failed; drives the user-facing message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Fetch,
    Create,
    Update,
    Delete,
    Ping,
}

impl Action {
    fn describe(self, cause: &str) -> String {
        match self {
            Action::Fetch => format!("Failed to fetch home features: {cause}"),
            Action::Create => format!("Failed to create home feature: {cause}"),
            Action::Update => format!("Failed to update home feature: {cause}"),
            Action::Delete => format!("Failed to delete home feature: {cause}"),
            Action::Ping => format!("Remote endpoint not reachable: {cause}"),
        }
    }

    fn fail(self, kind: ErrorKind, cause: &str) -> RemoteError {
        RemoteError::new(kind, self.describe(cause))
    }
}

/// Error body returned by PostgREST (`{"message": ..., "code": ..., ...}`).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Server-provided message from an error body, if any.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_slice(body).ok()?;
    let message = parsed.message.filter(|m| !m.trim().is_empty())?;
    Some(match parsed.hint.filter(|h| !h.trim().is_empty()) {
        Some(hint) => format!("{message} ({hint})"),
        None => message,
    })
}

/// Feature store backed by the hosted table's REST endpoint.
#[derive(Debug, Clone)]
pub struct RestFeatureStore {
    settings: Arc<RemoteSettings>,
}

impl RestFeatureStore {
    pub fn new(settings: RemoteSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    fn rest_root(&self) -> Result<Url, url::ParseError> {
        self.settings.base_url.join("rest/v1/")
    }

    fn table_url(&self, query: &[(&str, &str)]) -> Result<Url, url::ParseError> {
        let mut url = self.rest_root()?.join(&self.settings.table)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> HttpRequest {
        let s = &self.settings;
        let mut headers = vec![
            format!("apikey: {}", s.anon_key),
            format!("Authorization: Bearer {}", s.anon_key),
            format!("X-Client-Info: {}", s.client_info),
            "Accept: application/json".to_string(),
        ];
        if body.is_some() {
            headers.push("Content-Type: application/json".to_string());
        }
        if matches!(method, Method::Post | Method::Patch) {
            headers.push("Prefer: return=representation".to_string());
        }
        HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
            connect_timeout: s.connect_timeout,
            timeout: s.timeout,
        }
    }

    /// Run the blocking exchange off the async runtime.
    async fn exchange(&self, action: Action, req: HttpRequest) -> Result<HttpResponse, RemoteError> {
        tracing::debug!(method = ?req.method, url = %req.url, "remote request");
        match tokio::task::spawn_blocking(move || http::perform(&req)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(action.fail(classify_curl_error(&e), &e.to_string())),
            Err(e) => Err(action.fail(ErrorKind::Other, &e.to_string())),
        }
    }

    /// Exchange and require a 2xx status.
    async fn send(&self, action: Action, req: HttpRequest) -> Result<HttpResponse, RemoteError> {
        let response = self.exchange(action, req).await?;
        if response.is_success() {
            return Ok(response);
        }
        let cause =
            error_message(&response.body).unwrap_or_else(|| format!("HTTP {}", response.status));
        tracing::debug!(status = response.status, %cause, "remote request rejected");
        Err(action.fail(classify_http_status(response.status), &cause))
    }

    fn decode<T: DeserializeOwned>(action: Action, body: &[u8]) -> Result<T, RemoteError> {
        serde_json::from_slice(body)
            .map_err(|e| action.fail(ErrorKind::Other, &format!("invalid response: {e}")))
    }

    fn encode<T: serde::Serialize>(action: Action, value: &T) -> Result<Vec<u8>, RemoteError> {
        serde_json::to_vec(value)
            .map_err(|e| action.fail(ErrorKind::Other, &format!("invalid request body: {e}")))
    }

    fn url_or_fail(action: Action, url: Result<Url, url::ParseError>) -> Result<Url, RemoteError> {
        url.map_err(|e| action.fail(ErrorKind::Other, &format!("invalid URL: {e}")))
    }

    /// Representation responses are arrays; exactly one row is expected.
    fn single_row(action: Action, body: &[u8]) -> Result<Feature, RemoteError> {
        let mut rows: Vec<Feature> = Self::decode(action, body)?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            n => Err(action.fail(
                ErrorKind::Other,
                &format!("expected exactly one row, got {n}"),
            )),
        }
    }
}

#[async_trait]
impl FeatureStore for RestFeatureStore {
    async fn list_features(&self) -> Result<Vec<Feature>, RemoteError> {
        let action = Action::Fetch;
        let url = Self::url_or_fail(
            action,
            self.table_url(&[("select", "*"), ("order", "order.asc")]),
        )?;
        let response = self.send(action, self.request(Method::Get, url, None)).await?;
        Self::decode(action, &response.body)
    }

    async fn create_feature(&self, input: &NewFeature) -> Result<Feature, RemoteError> {
        let action = Action::Create;
        input
            .validate()
            .map_err(|e| action.fail(ErrorKind::Other, &e.to_string()))?;
        let url = Self::url_or_fail(action, self.table_url(&[("select", "*")]))?;
        let body = Self::encode(action, input)?;
        let response = self
            .send(action, self.request(Method::Post, url, Some(body)))
            .await?;
        Self::single_row(action, &response.body)
    }

    async fn update_feature(
        &self,
        id: &FeatureId,
        patch: &FeaturePatch,
    ) -> Result<Feature, RemoteError> {
        let action = Action::Update;
        patch
            .validate()
            .map_err(|e| action.fail(ErrorKind::Other, &e.to_string()))?;
        let filter = format!("eq.{}", id.as_str());
        let url = Self::url_or_fail(
            action,
            self.table_url(&[("id", filter.as_str()), ("select", "*")]),
        )?;
        let body = Self::encode(action, patch)?;
        let response = self
            .send(action, self.request(Method::Patch, url, Some(body)))
            .await?;
        Self::single_row(action, &response.body)
    }

    async fn delete_feature(&self, id: &FeatureId) -> Result<(), RemoteError> {
        let action = Action::Delete;
        let filter = format!("eq.{}", id.as_str());
        let url = Self::url_or_fail(action, self.table_url(&[("id", filter.as_str())]))?;
        self.send(action, self.request(Method::Delete, url, None))
            .await?;
        Ok(())
    }

    async fn check_connectivity(&self) -> Result<(), RemoteError> {
        let action = Action::Ping;
        let url = Self::url_or_fail(action, self.rest_root())?;
        let response = self
            .exchange(action, self.request(Method::Get, url, None))
            .await?;
        // The REST root answers 401 to keys without schema access; still reachable.
        if response.is_success() || response.status == 401 {
            return Ok(());
        }
        Err(action.fail(
            classify_http_status(response.status),
            &format!("HTTP {}", response.status),
        ))
    }
}
