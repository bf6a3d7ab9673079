//! In-process presence registry for live notification connections.
//!
//! Maps a user to their current live connection so pushes can be routed.
//! Constructed once at startup and passed by handle (cloneable) to the
//! connection-lifecycle handlers and the notifier, never reached through
//! global state.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::common::UserId;

/// A single event pushed over a live connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Wire-level event name (e.g. "notification").
    pub event: String,
    pub payload: serde_json::Value,
}

/// Handle to one live connection: a unique id plus the sending half of the
/// connection's outbound channel.
#[derive(Debug, Clone)]
pub struct Connection {
    id: Uuid,
    sender: mpsc::UnboundedSender<PushMessage>,
}

impl Connection {
    /// Create a connection handle and the receiving half the transport
    /// (e.g. the SSE stream) drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PushMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                sender,
            },
            receiver,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a message on this connection. Returns false if the receiving
    /// half is gone (client disconnected).
    pub fn push(&self, message: PushMessage) -> bool {
        self.sender.send(message).is_ok()
    }
}

/// Tracks which users currently have a live connection.
///
/// Thread-safe, cloneable. One connection per user: registering a new
/// connection for a user silently supersedes the previous mapping
/// (last-write-wins; the superseded sender is dropped, not closed here).
#[derive(Clone)]
pub struct PresenceRegistry {
    connections: Arc<RwLock<HashMap<UserId, Connection>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a user's live connection, replacing any previous one.
    pub async fn register(&self, user_id: UserId, connection: Connection) {
        let mut connections = self.connections.write().await;
        connections.insert(user_id, connection);
    }

    /// Remove a user's mapping, but only if it still points at the given
    /// connection. A late unregister from a stale connection must not
    /// clobber a newer one.
    pub async fn unregister(&self, user_id: UserId, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if let Some(current) = connections.get(&user_id) {
            if current.id() == connection_id {
                connections.remove(&user_id);
            }
        }
    }

    /// Current connection for a user, if any. Absence is a normal outcome.
    pub async fn lookup(&self, user_id: UserId) -> Option<Connection> {
        let connections = self.connections.read().await;
        connections.get(&user_id).cloned()
    }

    /// Number of users with a live connection (health reporting).
    pub async fn connected_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
