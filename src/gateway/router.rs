use super::{call_timeout, dispatch_within};
use crate::backend::client::BackendClient;
use crate::backend::protocol::{BackendResponse, RoutedRequest, UpsertBody, item_path};
use crate::error::GatewayResult;
use crate::partition::key::derive_partition_key;
use crate::partition::types::ServiceIdentity;

use reqwest::{Method, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Write/delete path: one key, one partition, one call, no retries.
pub struct PartitionRouter {
    backend: Arc<dyn BackendClient>,
    data_path: String,
    backend_timeout: Duration,
}

impl PartitionRouter {
    pub fn new(backend: Arc<dyn BackendClient>, data_path: &str, backend_timeout: Duration) -> Self {
        Self {
            backend,
            data_path: data_path.to_string(),
            backend_timeout,
        }
    }

    /// Sends `method` for `key` to its owning partition and returns the backend's answer verbatim.
    ///
    /// An invalid key fails before any network call is made.
    pub async fn route_write(
        &self,
        service: &ServiceIdentity,
        key: &str,
        method: Method,
        body: Option<UpsertBody>,
        deadline: Instant,
    ) -> GatewayResult<BackendResponse> {
        let partition_key = derive_partition_key(key)?;

        let mut request = RoutedRequest::new(
            method,
            service.clone(),
            partition_key,
            item_path(&self.data_path, key),
        );
        if let Some(body) = body {
            request = request.with_body(body);
        }

        let timeout = call_timeout(deadline, self.backend_timeout);
        let response = dispatch_within(self.backend.as_ref(), request, timeout).await?;

        tracing::debug!(
            "Routed {:?} to partition key {}: {}",
            key,
            partition_key,
            response.status
        );
        Ok(response)
    }

    /// Deletes `key` on its owning partition and returns the backend status.
    pub async fn route_delete(
        &self,
        service: &ServiceIdentity,
        key: &str,
        deadline: Instant,
    ) -> GatewayResult<StatusCode> {
        let response = self
            .route_write(service, key, Method::DELETE, None, deadline)
            .await?;
        Ok(response.status)
    }
}
