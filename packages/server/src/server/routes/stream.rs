//! SSE notification stream.
//!
//! GET /api/notifications/stream?token=JWT
//!
//! One stream per authenticated user. Connecting registers the user in the
//! presence registry; dropping the stream unregisters them (stale-safe, so a
//! reconnect that raced the old stream's teardown keeps the new mapping).
//!
//! Auth strategy: JWT passed as `?token=` query param, because EventSource
//! can't send custom headers. An Authorization header is accepted as a
//! fallback for non-browser clients.

use std::convert::Infallible;

use axum::extract::{Extension, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use serde::Deserialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::common::UserId;
use crate::kernel::PresenceRegistry;
use crate::server::app::AxumAppState;

#[derive(Deserialize)]
pub struct StreamQuery {
    /// JWT token for authentication
    token: Option<String>,
}

/// Unregisters the connection when the SSE stream is dropped.
struct PresenceGuard {
    presence: PresenceRegistry,
    user_id: UserId,
    connection_id: Uuid,
}

impl Drop for PresenceGuard {
    fn drop(&mut self) {
        let presence = self.presence.clone();
        let user_id = self.user_id;
        let connection_id = self.connection_id;
        tokio::spawn(async move {
            presence.unregister(user_id, connection_id).await;
            tracing::debug!(%user_id, "notification stream closed");
        });
    }
}

/// SSE stream handler.
pub async fn stream_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let token = query
        .token
        .or_else(|| extract_bearer_token(&headers))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = state
        .jwt_service
        .verify_token(&token)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let user_id = claims.user_id();

    let (connection, receiver) = crate::kernel::Connection::new();
    let guard = PresenceGuard {
        presence: state.presence.clone(),
        user_id,
        connection_id: connection.id(),
    };
    state.presence.register(user_id, connection).await;
    tracing::debug!(%user_id, "notification stream opened");

    let connected =
        tokio_stream::once(Ok::<_, Infallible>(Event::default().event("connected").data("ok")));

    // The guard rides inside the closure so it drops with the stream.
    let events = UnboundedReceiverStream::new(receiver).filter_map(move |message| {
        let _ = &guard;
        Event::default()
            .event(message.event)
            .json_data(&message.payload)
            .ok()
            .map(Ok)
    });

    Ok(Sse::new(connected.chain(events)).keep_alive(KeepAlive::default()))
}

/// Extract Bearer token from Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get("authorization")?.to_str().ok()?;
    auth.strip_prefix("Bearer ").map(|t| t.to_string())
}
