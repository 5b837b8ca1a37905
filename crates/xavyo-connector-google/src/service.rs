//! Per-connection Directory client cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, instrument};
use xavyo_connector::config::Connection;
use xavyo_connector::error::ConnectorResult;
use xavyo_connector::ids::ConnectionName;

use crate::config::GoogleDirectoryConfig;
use crate::directory_client::DirectoryClient;

type ClientSlot = Arc<OnceCell<Arc<DirectoryClient>>>;

/// Holds one authenticated client per connection for the process lifetime.
///
/// Concurrent first use of a connection builds exactly one client. A failed
/// build leaves the slot empty, so the next call tries again.
#[derive(Debug, Default)]
pub struct ServiceCache {
    clients: RwLock<HashMap<ConnectionName, ClientSlot>>,
    builds: AtomicUsize,
}

impl ServiceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the client of a connection, building it on first use.
    #[instrument(skip(self, connection), fields(connection = %connection.name))]
    pub async fn get_client(&self, connection: &Connection) -> ConnectorResult<Arc<DirectoryClient>> {
        let slot = self.slot(&connection.name).await;

        let client = slot
            .get_or_try_init(|| async {
                let config: GoogleDirectoryConfig = connection.parse_config()?;
                self.builds.fetch_add(1, Ordering::Relaxed);
                let client = DirectoryClient::connect(config).await?;
                info!("Created Directory client");
                Ok::<_, xavyo_connector::error::ConnectorError>(Arc::new(client))
            })
            .await?;

        Ok(Arc::clone(client))
    }

    async fn slot(&self, name: &ConnectionName) -> ClientSlot {
        {
            let clients = self.clients.read().await;
            if let Some(slot) = clients.get(name) {
                return Arc::clone(slot);
            }
        }

        let mut clients = self.clients.write().await;
        Arc::clone(clients.entry(name.clone()).or_default())
    }

    /// Drops the cached client of one connection.
    pub async fn invalidate(&self, name: &ConnectionName) {
        if self.clients.write().await.remove(name).is_some() {
            debug!(connection = %name, "Dropped cached Directory client");
        }
    }

    /// Drops every cached client.
    pub async fn clear(&self) {
        self.clients.write().await.clear();
    }

    /// Number of client builds attempted so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
