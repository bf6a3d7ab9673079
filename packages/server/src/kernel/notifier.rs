//! Best-effort push delivery to one online user.
//!
//! At-most-once by design: the committed gig/bid state is the source of
//! truth, the push is a latency convenience. Offline recipients miss the
//! event; there is no queue and no retry.

use serde_json::Value;

use crate::common::UserId;

use super::presence::{PresenceRegistry, PushMessage};

#[derive(Clone)]
pub struct Notifier {
    presence: PresenceRegistry,
}

impl Notifier {
    pub fn new(presence: PresenceRegistry) -> Self {
        Self { presence }
    }

    /// Deliver `payload` as `event` to the user's live connection, if any.
    /// Never fails: absence and closed connections are silently dropped.
    pub async fn notify(&self, user_id: UserId, event: &str, payload: Value) {
        match self.presence.lookup(user_id).await {
            Some(connection) => {
                let delivered = connection.push(PushMessage {
                    event: event.to_string(),
                    payload,
                });
                if delivered {
                    tracing::debug!(%user_id, event, "notification pushed");
                } else {
                    tracing::debug!(%user_id, event, "connection closed, notification dropped");
                }
            }
            None => {
                tracing::debug!(%user_id, event, "user offline, notification dropped");
            }
        }
    }
}
