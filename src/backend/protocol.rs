//! Backend Wire Protocol
//!
//! Value objects exchanged with backend partitions and the query parameters of the
//! reverse-proxy convention.

use crate::partition::types::ServiceIdentity;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Query parameter carrying the partition ordinal.
pub const PARAM_PARTITION_KEY: &str = "PartitionKey";
/// Query parameter carrying the partitioning scheme.
pub const PARAM_PARTITION_KIND: &str = "PartitionKind";
/// The only partitioning scheme the gateway speaks.
pub const PARTITION_KIND_INT64_RANGE: &str = "Int64Range";

/// A named counter as stored by the backend.
///
/// Also accepts the `{"Key": .., "Value": ..}` pair shape some backends emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "Key", alias = "key")]
    pub name: String,
    #[serde(alias = "Value", alias = "value")]
    pub count: u64,
}

/// Body of an upsert sent to the owning partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertBody {
    pub name: String,
}

/// A single call to one backend partition. Built per call, never kept.
#[derive(Debug, Clone)]
pub struct RoutedRequest {
    pub method: Method,
    pub service: ServiceIdentity,
    pub partition_key: i64,
    /// Resource path relative to the service's proxy address, starting with `/`.
    pub path: String,
    pub body: Option<UpsertBody>,
}

impl RoutedRequest {
    pub fn new(method: Method, service: ServiceIdentity, partition_key: i64, path: String) -> Self {
        Self {
            method,
            service,
            partition_key,
            path,
            body: None,
        }
    }

    pub fn with_body(mut self, body: UpsertBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Raw answer of a backend partition.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl BackendResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

/// Collection path for the data resource, e.g. `data` -> `/data`.
pub fn collection_path(data_path: &str) -> String {
    let trimmed = data_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Item path with the record name percent-encoded, e.g. `/data/Alice`.
pub fn item_path(data_path: &str, name: &str) -> String {
    format!(
        "{}/{}",
        collection_path(data_path),
        urlencoding::encode(name)
    )
}
