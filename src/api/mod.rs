//! API interaction module
//!
//! # Module Structure
//!
//! - [`transport`] - The [`Transport`](transport::Transport) contract and response bodies
//! - [`http`] - reqwest implementation of the transport
//! - [`client`] - Client facade sharing one transport across resource adapters
//!
//! # Example
//!
//! ```no_run
//! use bizfly::api::{client::Client, http::TransportConfig};
//!
//! async fn example() -> bizfly::Result<()> {
//!     let config = TransportConfig::new("https://manage.bizflycloud.vn")?.with_auth_token("token");
//!     let client = Client::from_config(config)?;
//!     let snapshots = client.snapshots().list(&Default::default()).await?;
//!     println!("{} snapshots", snapshots.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod transport;
