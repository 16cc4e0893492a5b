//! Per-session notification stream.
//!
//! On connect the client receives a `session_sync` with the transcript,
//! then one `notification` event per toast the session raises.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::{ApiError, AppState, lookup_session};
use crate::chat::{Session, TranscriptSnapshot};
use crate::notify::Notification;

/// Events pushed to notification stream clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    SessionSync { transcript: TranscriptSnapshot },
    Notification { notification: Notification },
}

pub(super) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let session = lookup_session(&state, &id).await?;
    info!(session_id = %session.id, "Notification stream connecting");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, session)).into_response())
}

async fn handle_socket(mut socket: WebSocket, session: Arc<Session>) {
    // Subscribe before the sync so nothing raised in between is lost.
    let mut rx = session.notifier().subscribe();

    if !send_event(&mut socket, &sync_event(&session).await).await {
        warn!(session_id = %session.id, "Failed to send initial sync, client disconnected");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(notification) => {
                        if !send_event(&mut socket, &WsEvent::Notification { notification }).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(session_id = %session.id, missed = n, "WS client lagged behind notifications");
                        if !send_event(&mut socket, &sync_event(&session).await).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Notification channel closed");
                        break;
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(session_id = %session.id, "Notification stream disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(session_id = %session.id, "Notification stream closed");
}

async fn sync_event(session: &Session) -> WsEvent {
    WsEvent::SessionSync {
        transcript: session.transcript().await.snapshot(),
    }
}

/// Returns `false` once the client is gone.
async fn send_event(socket: &mut WebSocket, event: &WsEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize WS event");
            true
        }
    }
}
