//! BizFly Client
//!
//! Entry point that owns the shared transport and hands out one adapter per
//! resource kind.

use super::http::{HttpTransport, TransportConfig};
use super::transport::Transport;
use crate::error::Result;
use crate::resource::{KeyService, ResourceClient, SnapshotService};
use std::sync::Arc;

/// Main BizFly client
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client around an existing transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Create a client backed by [`HttpTransport`]
    pub fn from_config(config: TransportConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Simple storage access keys
    pub fn storage_keys(&self) -> KeyService {
        ResourceClient::new(self.transport())
    }

    /// Volume snapshots
    pub fn snapshots(&self) -> SnapshotService {
        ResourceClient::new(self.transport())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
