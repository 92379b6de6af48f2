use super::{call_timeout, dispatch_within, list_within};
use crate::backend::client::BackendClient;
use crate::backend::protocol::{Record, RoutedRequest, collection_path};
use crate::config::Timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::partition::directory::PartitionDirectory;
use crate::partition::types::ServiceIdentity;

use reqwest::Method;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Read path: fans a list out to every partition and merges the partial results.
pub struct Aggregator {
    directory: Arc<dyn PartitionDirectory>,
    backend: Arc<dyn BackendClient>,
    data_path: String,
    timeouts: Timeouts,
}

impl Aggregator {
    pub fn new(
        directory: Arc<dyn PartitionDirectory>,
        backend: Arc<dyn BackendClient>,
        data_path: &str,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            directory,
            backend,
            data_path: data_path.to_string(),
            timeouts,
        }
    }

    /// Lists the records of every reachable partition.
    ///
    /// Fails only when the topology cannot be obtained. A partition that errors, times out
    /// or answers with anything but 200 is logged and left out of the result.
    pub async fn fan_out_list(
        &self,
        service: &ServiceIdentity,
        deadline: Instant,
    ) -> GatewayResult<Vec<Record>> {
        let timeout = call_timeout(deadline, self.timeouts.directory);
        let partitions = list_within(self.directory.as_ref(), service, timeout)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list partitions of {}: {}", service, e);
                GatewayError::AggregationFailed(e)
            })?;

        tracing::debug!("Fanning out list to {} partitions", partitions.len());

        let path = collection_path(&self.data_path);
        let mut pending = JoinSet::new();
        for partition in partitions {
            let backend = Arc::clone(&self.backend);
            let request = RoutedRequest::new(
                Method::GET,
                service.clone(),
                partition.low_key,
                path.clone(),
            );
            let timeout = call_timeout(deadline, self.timeouts.backend);

            pending.spawn(async move {
                let result = dispatch_within(backend.as_ref(), request, timeout).await;
                (partition, result)
            });
        }

        let mut records = Vec::new();
        while let Some(joined) = pending.join_next().await {
            let (partition, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("Partition task did not complete: {}", e);
                    continue;
                }
            };

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        partition = %partition.id,
                        low_key = partition.low_key,
                        "Skipping partition: {}",
                        e
                    );
                    continue;
                }
            };

            if !response.is_ok() {
                tracing::warn!(
                    partition = %partition.id,
                    low_key = partition.low_key,
                    "Skipping partition: status {}",
                    response.status
                );
                continue;
            }

            match serde_json::from_str::<Vec<Record>>(&response.body) {
                Ok(mut partial) => records.append(&mut partial),
                Err(e) => {
                    tracing::warn!(
                        partition = %partition.id,
                        low_key = partition.low_key,
                        "Skipping partition: malformed body: {}",
                        e
                    );
                }
            }
        }

        Ok(records)
    }
}
