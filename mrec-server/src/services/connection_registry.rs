//! Registry of long-lived connections
//!
//! Process-wide set of open connections with its own lifecycle. The
//! recognition path never touches it; `serve` drains it once after the HTTP
//! server has stopped.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A connection that must be closed before the process exits
#[async_trait::async_trait]
pub trait ManagedConnection: Send + Sync {
    /// Short label for logs
    fn label(&self) -> &str;

    async fn close(&self);
}

/// Cloneable handle to the shared connection set
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<Mutex<HashMap<Uuid, Arc<dyn ManagedConnection>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection, returning the id used to unregister it
    pub async fn register(&self, connection: Arc<dyn ManagedConnection>) -> Uuid {
        let id = Uuid::new_v4();
        tracing::debug!(connection_id = %id, label = connection.label(), "Connection registered");
        self.connections.lock().await.insert(id, connection);
        id
    }

    /// Remove a connection without closing it
    ///
    /// Returns `false` if `id` was not registered.
    pub async fn unregister(&self, id: Uuid) -> bool {
        self.connections.lock().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    /// Close every registered connection concurrently and empty the registry
    ///
    /// Returns the number of connections closed.
    pub async fn close_all(&self) -> usize {
        let drained: Vec<_> = self.connections.lock().await.drain().collect();
        let count = drained.len();

        if count == 0 {
            return 0;
        }

        tracing::info!(connections = count, "Closing registered connections");

        join_all(drained.iter().map(|(id, connection)| async move {
            connection.close().await;
            tracing::debug!(connection_id = %id, label = connection.label(), "Connection closed");
        }))
        .await;

        count
    }
}
