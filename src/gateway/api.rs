use super::aggregator::Aggregator;
use super::router::PartitionRouter;
use crate::backend::client::{BackendClient, HttpBackendClient};
use crate::backend::protocol::{BackendResponse, Record, UpsertBody};
use crate::config::{GatewayConfig, Timeouts};
use crate::error::GatewayResult;
use crate::partition::directory::{ClusterPartitionDirectory, PartitionDirectory};
use crate::partition::types::ServiceIdentity;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use std::sync::Arc;
use tokio::time::Instant;

/// Client-facing operations on the votes resource.
///
/// Holds no per-request state; one instance serves every request concurrently.
pub struct VotesGateway {
    service: ServiceIdentity,
    aggregator: Aggregator,
    router: PartitionRouter,
    timeouts: Timeouts,
}

impl VotesGateway {
    pub fn new(
        service: ServiceIdentity,
        directory: Arc<dyn PartitionDirectory>,
        backend: Arc<dyn BackendClient>,
        data_path: &str,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            aggregator: Aggregator::new(directory, Arc::clone(&backend), data_path, timeouts),
            router: PartitionRouter::new(backend, data_path, timeouts.backend),
            service,
            timeouts,
        }
    }

    /// Wires the HTTP backend client and the configured directory around one shared
    /// connection pool.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder().build()?;

        let directory: Arc<dyn PartitionDirectory> = match &config.cluster_endpoint {
            Some(endpoint) => {
                tracing::info!("Using cluster partition directory at {}", endpoint);
                Arc::new(ClusterPartitionDirectory::new(http_client.clone(), endpoint))
            }
            None => {
                tracing::info!(
                    "Using static partition directory with {} partitions",
                    config.static_partitions.partitions().len()
                );
                Arc::new(config.static_partitions.clone())
            }
        };
        let backend = Arc::new(HttpBackendClient::new(http_client, &config.proxy_host));

        Ok(Self::new(
            config.service.clone(),
            directory,
            backend,
            &config.data_path,
            config.timeouts,
        ))
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Instant {
        Instant::now() + self.timeouts.request
    }

    /// Every record of every reachable partition; partially unavailable backends yield
    /// fewer records, not an error.
    pub async fn list(&self, deadline: Instant) -> GatewayResult<Vec<Record>> {
        self.aggregator.fan_out_list(&self.service, deadline).await
    }

    /// Upserts `name` on its owning partition; status and body come back as the backend sent them.
    pub async fn upsert(&self, name: &str, deadline: Instant) -> GatewayResult<BackendResponse> {
        let body = UpsertBody {
            name: name.to_string(),
        };
        self.router
            .route_write(&self.service, name, Method::PUT, Some(body), deadline)
            .await
    }

    /// Deletes `name`. The backend body is dropped: 200 is reported as a bare OK and any
    /// other status is mirrored without content.
    pub async fn remove(&self, name: &str, deadline: Instant) -> GatewayResult<StatusCode> {
        self.router
            .route_delete(&self.service, name, deadline)
            .await
    }
}
