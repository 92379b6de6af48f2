use super::protocol::{
    BackendResponse, PARAM_PARTITION_KEY, PARAM_PARTITION_KIND, PARTITION_KIND_INT64_RANGE,
    RoutedRequest,
};
use crate::error::DispatchError;
use crate::partition::types::ServiceIdentity;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Performs a single call against one backend partition.
///
/// Implementations never retry and never interpret the status code.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn dispatch(
        &self,
        request: RoutedRequest,
        timeout: Duration,
    ) -> Result<BackendResponse, DispatchError>;
}

/// `BackendClient` reaching partitions through the reverse proxy over HTTP.
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    proxy_host: String,
}

impl HttpBackendClient {
    pub fn new(http_client: reqwest::Client, proxy_host: &str) -> Self {
        Self {
            http_client,
            proxy_host: normalize_host(proxy_host),
        }
    }

    /// Reverse-proxy address of a service, e.g. `http://localhost:19081/VotingApplication/VotingData`.
    pub fn proxy_address(&self, service: &ServiceIdentity) -> String {
        format!("{}{}", self.proxy_host, service.path())
    }

    pub fn target_url(&self, request: &RoutedRequest) -> String {
        format!(
            "{}{}?{}={}&{}={}",
            self.proxy_address(&request.service),
            request.path,
            PARAM_PARTITION_KEY,
            request.partition_key,
            PARAM_PARTITION_KIND,
            PARTITION_KIND_INT64_RANGE
        )
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn dispatch(
        &self,
        request: RoutedRequest,
        timeout: Duration,
    ) -> Result<BackendResponse, DispatchError> {
        let url = self.target_url(&request);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .http_client
            .request(request.method, url)
            .timeout(timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(DispatchError::from_reqwest)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(DispatchError::from_reqwest)?;

        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}

fn normalize_host(host: &str) -> String {
    let trimmed = host.trim();
    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}
