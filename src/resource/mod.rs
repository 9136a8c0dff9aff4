//! Resource abstraction layer
//!
//! Every remote collection is driven by the same generic adapter,
//! [`ResourceClient`], parameterized by a [`ResourceKind`] that names the
//! collection path and the shape of its create and list responses.
//!
//! # Architecture
//!
//! - [`kind`] - Resource specs and response shapes
//! - [`client`] - The generic create/get/delete/list adapter
//! - [`options`] - Query parameters for list calls
//! - [`key`], [`snapshot`], [`volume`] - Concrete resource records
//!
//! # Example
//!
//! ```no_run
//! use bizfly::resource::{ListOptions, SnapshotService};
//!
//! async fn list_available(snapshots: &SnapshotService) -> bizfly::Result<usize> {
//!     let options = ListOptions::new().filter("status", "available");
//!     Ok(snapshots.list(&options).await?.len())
//! }
//! ```

pub mod client;
mod de;
pub mod key;
pub mod kind;
pub mod options;
pub mod snapshot;
pub mod volume;

pub use client::ResourceClient;
pub use key::{KeyCreateRequest, KeyHaveSecret, KeyInList, StorageKeys};
pub use kind::{ResourceKind, ResourceSpec, Shape};
pub use options::ListOptions;
pub use snapshot::{Snapshot, SnapshotCreateRequest, Snapshots};
pub use volume::{Volume, VolumeAttachment};

/// Storage key operations
pub type KeyService = ResourceClient<StorageKeys>;

/// Snapshot operations
pub type SnapshotService = ResourceClient<Snapshots>;
