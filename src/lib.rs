//! Client for the BizFly Cloud storage-key and volume-snapshot APIs.
//!
//! Build a [`Client`] from a [`TransportConfig`](api::http::TransportConfig),
//! or around any [`Transport`](api::transport::Transport), then take the
//! service for the resource you need:
//!
//! ```no_run
//! use bizfly::{Client, SnapshotCreateRequest};
//! use bizfly::api::http::TransportConfig;
//!
//! # async fn run() -> bizfly::Result<()> {
//! let config = TransportConfig::new("https://manage.bizflycloud.vn")?
//!     .with_auth_token("token")
//!     .with_project_id("project");
//! let client = Client::from_config(config)?;
//!
//! let snapshot = client
//!     .snapshots()
//!     .create(&SnapshotCreateRequest {
//!         name: "nightly".to_string(),
//!         volume_id: "volume-id".to_string(),
//!         force: false,
//!     })
//!     .await?;
//! println!("{} is {}", snapshot.id, snapshot.status);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::client::Client;
pub use error::{DecodeError, Error, Result};
pub use resource::{
    KeyCreateRequest, KeyHaveSecret, KeyInList, KeyService, ListOptions, Snapshot,
    SnapshotCreateRequest, SnapshotService, Volume,
};
