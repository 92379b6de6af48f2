//! Partitioned Votes Gateway Library
//!
//! A stateless front door for a vote counter stored in a range-partitioned backend
//! service. Clients list, upsert and delete counters by name; the gateway works out
//! which backend partitions to call and never exposes the topology.
//!
//! ## Architecture Modules
//! - **`partition`**: Key-to-ordinal derivation, service identities and the
//!   `PartitionDirectory` that reports the live partition set.
//! - **`backend`**: The reverse-proxy URL convention and the `BackendClient` that performs
//!   one HTTP call against one partition.
//! - **`gateway`**: Fan-out/merge for reads, single-partition routing for writes, and the
//!   Axum handlers exposing them.
//! - **`config`**: Environment and command line settings.
//! - **`error`**: The error taxonomy and its mapping onto HTTP responses.

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod partition;
