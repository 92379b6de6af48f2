//! Partition Topology Module
//!
//! Everything the gateway knows about how the backend service is sharded.
//!
//! ## Core Concepts
//! - **Key Space**: Keys map onto 26 ordinals by the alphabet position of their first letter.
//!   The backend partitions the same space, so the mapping is a wire contract.
//! - **Descriptors**: A partition is an inclusive ordinal range `[low_key, high_key]` plus an id.
//! - **Directory**: Topology is read fresh from a `PartitionDirectory` on every gateway operation.

pub mod directory;
pub mod key;
pub mod types;
