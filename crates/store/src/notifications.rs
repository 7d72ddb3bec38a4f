//! Real-time catalog notifications.
//!
//! A single broadcast channel with no per-client state: route handlers
//! publish [`CatalogEvent`]s after catalog writes, and every connected
//! WebSocket client receives them as JSON text frames. Slow subscribers
//! that fall behind the channel capacity drop the oldest events and keep
//! receiving (broadcast semantics).

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::Product;

/// Events buffered per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 64;

/// A catalog change pushed to connected clients.
///
/// Each event carries the refreshed product list so clients can re-render
/// without a follow-up fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// Current catalog, sent to each client when it connects.
    Snapshot { products: Vec<Product> },
    ProductCreated { products: Vec<Product> },
    ProductDeleted { products: Vec<Product> },
}

/// Broadcast hub for catalog notifications.
///
/// Cheap to clone; all clones publish into the same channel.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<CatalogEvent>,
}

impl NotificationHub {
    /// Create a hub with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to catalog events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of receivers the event reached; zero when nobody
    /// is listening, which is not an error.
    pub fn publish(&self, event: CatalogEvent) -> usize {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                tracing::debug!(receivers = receiver_count, "catalog event broadcast");
                receiver_count
            }
            Err(_) => {
                // No active receivers - channel exists but no one listening
                tracing::debug!("catalog event had no active receivers");
                0
            }
        }
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
