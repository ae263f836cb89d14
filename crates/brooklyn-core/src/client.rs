//! Remote Brooklyn REST API client.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to connect to server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Task handle returned by deploy and expunge requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    #[serde(default)]
    pub id: String,
    /// Free-form status, e.g. `RUNNING`.
    #[serde(default)]
    pub status: String,
}

/// Operations the lifecycle controller needs from the remote service.
#[async_trait]
pub trait BrooklynApi: Send + Sync {
    /// Deploy a YAML blueprint. The returned `entity_id` identifies the new
    /// application.
    async fn create_from_definition(&self, definition: &[u8]) -> Result<TaskSummary, ClientError>;

    async fn application_summary(
        &self,
        application_id: &str,
    ) -> Result<ApplicationSummary, ClientError>;

    async fn rename(
        &self,
        application_id: &str,
        entity_id: &str,
        new_name: &str,
    ) -> Result<String, ClientError>;

    /// Any 2xx reply counts as accepted. The task handle is `None` when the
    /// reply carries no decodable body.
    async fn expunge(
        &self,
        application_id: &str,
        entity_id: &str,
        release: bool,
    ) -> Result<Option<TaskSummary>, ClientError>;
}

/// HTTP implementation of [`BrooklynApi`] using basic authentication.
#[derive(Debug, Clone)]
pub struct BrooklynClient {
    http: reqwest::Client,
    base_url: Url,
    access_key: String,
    secret_key: String,
}

impl BrooklynClient {
    pub fn new(
        endpoint_url: &str,
        access_key: &str,
        secret_key: &str,
        skip_ssl_checks: bool,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(endpoint_url)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{endpoint_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(endpoint_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(skip_ssl_checks)
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot-be-a-base URLs are rejected in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Brooklyn request");
        self.http
            .request(method, url)
            .basic_auth(&self.access_key, Some(&self.secret_key))
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl BrooklynApi for BrooklynClient {
    async fn create_from_definition(&self, definition: &[u8]) -> Result<TaskSummary, ClientError> {
        let url = self.api_url(&["v1", "applications"]);
        let resp = self
            .request(Method::POST, url)
            .header("Content-Type", "application/x-yaml")
            .body(definition.to_vec())
            .send()
            .await?;
        decode(handle_response(resp).await?)
    }

    async fn application_summary(
        &self,
        application_id: &str,
    ) -> Result<ApplicationSummary, ClientError> {
        let url = self.api_url(&["v1", "applications", application_id]);
        let resp = self.request(Method::GET, url).send().await?;
        decode(handle_response(resp).await?)
    }

    async fn rename(
        &self,
        application_id: &str,
        entity_id: &str,
        new_name: &str,
    ) -> Result<String, ClientError> {
        let mut url = self.api_url(&[
            "v1",
            "applications",
            application_id,
            "entities",
            entity_id,
            "name",
        ]);
        url.query_pairs_mut().append_pair("name", new_name);
        let resp = self.request(Method::POST, url).send().await?;
        handle_response(resp).await
    }

    async fn expunge(
        &self,
        application_id: &str,
        entity_id: &str,
        release: bool,
    ) -> Result<Option<TaskSummary>, ClientError> {
        let mut url = self.api_url(&[
            "v1",
            "applications",
            application_id,
            "entities",
            entity_id,
            "expunge",
        ]);
        url.query_pairs_mut()
            .append_pair("release", if release { "true" } else { "false" });
        let resp = self.request(Method::POST, url).send().await?;
        let body = handle_response(resp).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&body) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                debug!(application_id, error = %e, "Ignoring undecodable expunge response");
                Ok(None)
            }
        }
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<String, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            body: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp.text().await?)
}

fn decode<T: DeserializeOwned>(body: String) -> Result<T, ClientError> {
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_appends_segments() {
        let client = BrooklynClient::new("https://brooklyn.local:8443/", "key", "secret", false)
            .unwrap();
        let url = client.api_url(&["v1", "applications", "abc123"]);
        assert_eq!(url.as_str(), "https://brooklyn.local:8443/v1/applications/abc123");
    }

    #[test]
    fn test_api_url_keeps_base_path() {
        let client =
            BrooklynClient::new("http://proxy.local/brooklyn", "key", "secret", true).unwrap();
        let url = client.api_url(&["v1", "applications"]);
        assert_eq!(url.as_str(), "http://proxy.local/brooklyn/v1/applications");
    }

    #[test]
    fn test_api_url_escapes_ids() {
        let client = BrooklynClient::new("http://localhost:8081", "key", "secret", false).unwrap();
        let url = client.api_url(&["v1", "applications", "a/b c"]);
        assert_eq!(url.as_str(), "http://localhost:8081/v1/applications/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            BrooklynClient::new("not a url", "key", "secret", false),
            Err(ClientError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            BrooklynClient::new("mailto:ops@example.com", "key", "secret", false),
            Err(ClientError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_task_summary_decodes_camel_case() {
        let summary: TaskSummary = serde_json::from_str(
            r#"{"id":"t1","entityId":"app42","entityDisplayName":"web","currentStatus":"In progress"}"#,
        )
        .unwrap();
        assert_eq!(summary.entity_id, "app42");
        assert_eq!(summary.entity_display_name.as_deref(), Some("web"));
        assert_eq!(summary.display_name, None);
    }
}
