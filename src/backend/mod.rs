//! Backend Access Module
//!
//! Talks to individual partitions of the backend data service through the reverse proxy.
//!
//! ## Core Concepts
//! - **Reverse-proxy convention**: `{proxy_host}{service_path}/{resource}?PartitionKey=K&PartitionKind=Int64Range`
//!   reaches the partition whose range contains ordinal `K`.
//! - **Raw passthrough**: `BackendClient` returns status and body untouched; callers decide
//!   what a status means.
//!
//! ## Submodules
//! - **`client`**: The `BackendClient` seam and its `reqwest` implementation.
//! - **`protocol`**: Records, request/response value objects and wire constants.

pub mod client;
pub mod protocol;
