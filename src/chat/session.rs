//! In-memory chat sessions shared between request handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};
use uuid::Uuid;

use super::model::ChatMessage;
use super::transcript::{SendOutcome, Transcript};
use crate::error::GatewayError;
use crate::gateway::{AssistanceResponse, FashionGateway, with_timeout};
use crate::notify::Notifier;

/// Result of asking a shared session to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSend {
    /// The send ran to completion; `appended` holds the user and AI messages.
    Completed {
        outcome: SendOutcome,
        appended: Vec<ChatMessage>,
    },
    /// Another send is in flight.
    Busy,
    /// No text and no attachment.
    Empty,
}

/// One user's chat session.
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    transcript: Mutex<Transcript>,
    notifier: Notifier,
    request_timeout: Duration,
}

impl Session {
    fn new(initial_context: Option<&str>, request_timeout: Duration) -> Self {
        let notifier = Notifier::new();
        let mut transcript =
            Transcript::new(notifier.clone()).with_request_timeout(request_timeout);
        transcript.initialize(initial_context);

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Mutex::new(transcript),
            notifier,
            request_timeout,
        }
    }

    /// Lock the transcript for a short, non-suspending operation.
    pub async fn transcript(&self) -> tokio::sync::MutexGuard<'_, Transcript> {
        self.transcript.lock().await
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Send `text`, releasing the transcript lock while the gateway works so
    /// readers still see the session (and a concurrent send sees `Busy`).
    ///
    /// The gateway call and its completion run on a spawned task that owns
    /// the session, so a caller that goes away mid-call (a dropped HTTP
    /// request) still leaves the transcript answered and idle.
    pub async fn send(
        self: &Arc<Self>,
        gateway: Arc<dyn FashionGateway>,
        text: &str,
    ) -> SessionSend {
        let (request, start) = {
            let mut transcript = self.transcript.lock().await;
            if transcript.is_awaiting_response() {
                return SessionSend::Busy;
            }
            let start = transcript.messages().len();
            match transcript.begin_send(text) {
                Some(request) => (request, start),
                None => return SessionSend::Empty,
            }
        };

        let session = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = with_timeout(
                session.request_timeout,
                gateway.answer_fashion_question(request),
            )
            .await;
            session.finish_send(result, start).await
        });

        match task.await {
            Ok(done) => done,
            Err(e) => {
                error!(session_id = %self.id, error = %e, "Send task failed");
                self.finish_send(Err(GatewayError::Interrupted), start).await
            }
        }
    }

    async fn finish_send(
        &self,
        result: Result<AssistanceResponse, GatewayError>,
        start: usize,
    ) -> SessionSend {
        let mut transcript = self.transcript.lock().await;
        let outcome = transcript.complete_send(result);
        SessionSend::Completed {
            outcome,
            appended: transcript.messages()[start..].to_vec(),
        }
    }
}

/// All live sessions. Nothing is persisted.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
    request_timeout: Duration,
}

impl SessionStore {
    pub fn new(request_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            request_timeout,
        })
    }

    /// Open a new session, seeded from `initial_context` when given.
    pub async fn create(&self, initial_context: Option<&str>) -> Arc<Session> {
        let session = Arc::new(Session::new(initial_context, self.request_timeout));
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::clone(&session));

        info!(
            session_id = %session.id,
            with_context = initial_context.is_some(),
            "Chat session opened"
        );
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Chat session closed");
        }
        removed
    }

    /// Bound applied to every gateway call made on behalf of a session.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
