//! Votes Gateway Module
//!
//! Turns key-based client operations into calls against the right backend partitions.
//!
//! ## Request Paths
//! - **Read (fan-out)**: `Aggregator` asks the directory for the current topology, queries every
//!   partition concurrently and merges whatever comes back. A missing partition shrinks the result;
//!   only a missing topology fails the read.
//! - **Write/Delete (routed)**: `PartitionRouter` derives the owning ordinal from the key and makes
//!   exactly one call, passing the backend's answer through untouched.
//!
//! ## Submodules
//! - **`aggregator`**: Fan-out and merge of the list operation.
//! - **`router`**: Single-partition dispatch for upsert and delete.
//! - **`api`**: `VotesGateway`, the list/upsert/remove entry points.
//! - **`handlers`**: HTTP request handlers for the Axum web server.

pub mod aggregator;
pub mod api;
pub mod handlers;
pub mod router;


use crate::backend::client::BackendClient;
use crate::backend::protocol::{BackendResponse, RoutedRequest};
use crate::error::{DirectoryError, DispatchError};
use crate::partition::directory::PartitionDirectory;
use crate::partition::types::{PartitionDescriptor, ServiceIdentity};
use std::time::Duration;
use tokio::time::Instant;

/// Time a single network call may take: its own cap, bounded by what is left of the deadline.
pub(crate) fn call_timeout(deadline: Instant, cap: Duration) -> Duration {
    deadline.saturating_duration_since(Instant::now()).min(cap)
}

/// Dispatches with a hard stop at `timeout`, whether or not the client honours it.
pub(crate) async fn dispatch_within(
    backend: &dyn BackendClient,
    request: RoutedRequest,
    timeout: Duration,
) -> Result<BackendResponse, DispatchError> {
    match tokio::time::timeout(timeout, backend.dispatch(request, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(DispatchError::Timeout),
    }
}

/// Lists partitions with a hard stop at `timeout`, whether or not the directory honours it.
pub(crate) async fn list_within(
    directory: &dyn PartitionDirectory,
    service: &ServiceIdentity,
    timeout: Duration,
) -> Result<Vec<PartitionDescriptor>, DirectoryError> {
    match tokio::time::timeout(timeout, directory.list_partitions(service, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(DirectoryError::Timeout),
    }
}
