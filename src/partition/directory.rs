//! Partition Directory
//!
//! Resolves the live set of partitions owned by a backend service. The gateway asks
//! for it on every operation and never caches the answer between requests.

use super::key::KEY_SPACE_SIZE;
use super::types::{PartitionDescriptor, ServiceIdentity};
use crate::error::DirectoryError;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// API version requested from the cluster management endpoint.
pub const CLUSTER_API_VERSION: &str = "6.0";

const INT64_RANGE_KIND: &str = "Int64Range";

#[async_trait]
pub trait PartitionDirectory: Send + Sync {
    /// Returns the partitions of `service` ordered by `low_key`.
    ///
    /// The query must finish within `timeout`, otherwise `DirectoryError::Timeout`.
    async fn list_partitions(
        &self,
        service: &ServiceIdentity,
        timeout: Duration,
    ) -> Result<Vec<PartitionDescriptor>, DirectoryError>;
}

/// Fixed topology, typically taken from configuration.
#[derive(Debug, Clone)]
pub struct StaticPartitionDirectory {
    partitions: Vec<PartitionDescriptor>,
}

impl StaticPartitionDirectory {
    pub fn new(mut partitions: Vec<PartitionDescriptor>) -> Self {
        partitions.sort_by_key(|partition| partition.low_key);
        Self { partitions }
    }

    /// Splits the key space into `count` contiguous ranges of near-equal width.
    pub fn uniform(count: usize) -> Self {
        let count = (count.max(1) as i64).min(KEY_SPACE_SIZE);
        let partitions = (0..count)
            .map(|i| {
                let low_key = i * KEY_SPACE_SIZE / count;
                let high_key = (i + 1) * KEY_SPACE_SIZE / count - 1;
                PartitionDescriptor::new(format!("static-{}", i), low_key, high_key)
            })
            .collect();
        Self::new(partitions)
    }

    /// Parses a comma separated list of inclusive ranges, e.g. `"0-12,13-25"`.
    /// A bare number is a single-ordinal range.
    pub fn parse(ranges: &str) -> Result<Self> {
        let mut partitions = Vec::new();

        for (i, part) in ranges
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .enumerate()
        {
            let (low, high) = part.split_once('-').unwrap_or((part, part));
            let low_key: i64 = low
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid partition range {:?}: {}", part, e))?;
            let high_key: i64 = high
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid partition range {:?}: {}", part, e))?;

            if low_key > high_key {
                return Err(anyhow::anyhow!(
                    "Partition range {:?} has low key above high key",
                    part
                ));
            }

            partitions.push(PartitionDescriptor::new(
                format!("static-{}", i),
                low_key,
                high_key,
            ));
        }

        if partitions.is_empty() {
            return Err(anyhow::anyhow!("Partition list is empty"));
        }

        Ok(Self::new(partitions))
    }

    pub fn partitions(&self) -> &[PartitionDescriptor] {
        &self.partitions
    }
}

#[async_trait]
impl PartitionDirectory for StaticPartitionDirectory {
    async fn list_partitions(
        &self,
        _service: &ServiceIdentity,
        _timeout: Duration,
    ) -> Result<Vec<PartitionDescriptor>, DirectoryError> {
        Ok(self.partitions.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartitionListPage {
    #[serde(default)]
    continuation_token: Option<String>,
    #[serde(default)]
    items: Vec<PartitionItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartitionItem {
    partition_information: PartitionInformation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PartitionInformation {
    service_partition_kind: String,
    id: String,
    #[serde(default)]
    low_key: Option<String>,
    #[serde(default)]
    high_key: Option<String>,
}

impl PartitionInformation {
    fn into_descriptor(self) -> Result<Option<PartitionDescriptor>, DirectoryError> {
        if self.service_partition_kind != INT64_RANGE_KIND {
            tracing::warn!(
                partition = %self.id,
                kind = %self.service_partition_kind,
                "Skipping partition that is not range partitioned"
            );
            return Ok(None);
        }

        let low_key = parse_key(&self.id, self.low_key.as_deref())?;
        let high_key = parse_key(&self.id, self.high_key.as_deref())?;
        Ok(Some(PartitionDescriptor::new(self.id, low_key, high_key)))
    }
}

fn parse_key(partition_id: &str, raw: Option<&str>) -> Result<i64, DirectoryError> {
    raw.and_then(|raw| raw.parse().ok()).ok_or_else(|| {
        DirectoryError::Unavailable(format!(
            "partition {} reported an invalid key bound {:?}",
            partition_id, raw
        ))
    })
}

/// Queries a cluster management endpoint for the partitions of a service.
///
/// Follows continuation tokens until the listing is complete.
pub struct ClusterPartitionDirectory {
    http_client: reqwest::Client,
    endpoint: String,
}

impl ClusterPartitionDirectory {
    pub fn new(http_client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            http_client,
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn partitions_url(&self, service: &ServiceIdentity) -> String {
        format!(
            "{}/Applications/{}/$/GetServices/{}/$/GetPartitions?api-version={}",
            self.endpoint,
            urlencoding::encode(service.application_id()),
            urlencoding::encode(&service.service_id()),
            CLUSTER_API_VERSION
        )
    }

    async fn fetch_page(
        &self,
        url: String,
        timeout: Duration,
    ) -> Result<PartitionListPage, DirectoryError> {
        let response = self
            .http_client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(directory_error)?;

        if !response.status().is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "partition query failed {}",
                response.status()
            )));
        }

        response.json().await.map_err(directory_error)
    }

    async fn query(
        &self,
        service: &ServiceIdentity,
        timeout: Duration,
    ) -> Result<Vec<PartitionDescriptor>, DirectoryError> {
        let base_url = self.partitions_url(service);
        let mut partitions = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let url = match &continuation {
                Some(token) => format!(
                    "{}&ContinuationToken={}",
                    base_url,
                    urlencoding::encode(token)
                ),
                None => base_url.clone(),
            };

            let page = self.fetch_page(url, timeout).await?;
            for item in page.items {
                if let Some(descriptor) = item.partition_information.into_descriptor()? {
                    partitions.push(descriptor);
                }
            }

            match page.continuation_token {
                Some(token) if !token.is_empty() => continuation = Some(token),
                _ => break,
            }
        }

        partitions.sort_by_key(|partition| partition.low_key);
        Ok(partitions)
    }
}

fn directory_error(err: reqwest::Error) -> DirectoryError {
    if err.is_timeout() {
        DirectoryError::Timeout
    } else {
        DirectoryError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl PartitionDirectory for ClusterPartitionDirectory {
    async fn list_partitions(
        &self,
        service: &ServiceIdentity,
        timeout: Duration,
    ) -> Result<Vec<PartitionDescriptor>, DirectoryError> {
        match tokio::time::timeout(timeout, self.query(service, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(DirectoryError::Timeout),
        }
    }
}
