//! Transcript manager: one chat session's message log and send cycle.
//!
//! A send moves the session `Idle -> Sending -> Idle`, appending the user
//! message on the way in and exactly one AI message on the way out (the
//! answer, or a fixed fallback when the gateway fails). At most one send is
//! in flight; a second one is rejected, not queued.
//!
//! `begin_send` / `complete_send` split the cycle so a session shared
//! behind a lock does not hold it across the gateway call. `send` runs the
//! whole cycle for a session with a single owner.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::model::ChatMessage;
use crate::error::{AttachmentError, GatewayError};
use crate::gateway::{AssistanceRequest, AssistanceResponse, FashionGateway, with_timeout};
use crate::image::ImageDataUri;
use crate::notify::Notifier;

/// Seed used when the session opens without DripSeek context.
pub const GREETING: &str = "Hi! I'm your Fashion Decoder assistant. Ask me anything about \
                            fashion, or attach an image for more specific help!";

/// Reply appended when the gateway call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that. Please try again.";

const IMAGE_READ_ERROR_TITLE: &str = "Image Read Error";
const IMAGE_READ_ERROR_DESCRIPTION: &str =
    "Could not read the selected image. Please try another file.";
const AI_ERROR_TITLE: &str = "AI Error";

/// Default bound on a single gateway call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Seed text for a session opened with DripSeek context.
pub fn context_seed(context: &str) -> String {
    format!(
        "Keywords found: \"{context}\". What would you like to know about the fashion in this \
         scene? Ask about specific items, styles, or where to find them! You can also browse \
         suggestions below."
    )
}

/// Append the shopping link to an answer, if the gateway produced one.
pub fn reply_text(response: &AssistanceResponse) -> String {
    match &response.search_link {
        Some(link) => format!("{}\n\nShop similar items: {}", response.answer, link),
        None => response.answer.clone(),
    }
}

/// How the session's first message was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedKind {
    Greeting,
    Context,
}

/// Terminal state of one send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    Answered,
    Failed,
}

/// Serializable view of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSnapshot {
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    pub attachment: Option<ImageDataUri>,
    pub awaiting_response: bool,
    pub context: Option<String>,
}

pub struct Transcript {
    messages: Vec<ChatMessage>,
    draft: String,
    attachment: Option<ImageDataUri>,
    awaiting_response: bool,
    context: Option<String>,
    seed: Option<SeedKind>,
    notifier: Notifier,
    request_timeout: Duration,
}

impl Transcript {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            messages: Vec::new(),
            draft: String::new(),
            attachment: None,
            awaiting_response: false,
            context: None,
            seed: None,
            notifier,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn attachment(&self) -> Option<&ImageDataUri> {
        self.attachment.as_ref()
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Context carried over from the session opening, if any.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Seed a fresh session with one AI message. Returns `false` (and does
    /// nothing) when the log already has entries.
    pub fn initialize(&mut self, initial_context: Option<&str>) -> bool {
        if !self.messages.is_empty() {
            debug!("Transcript already seeded; initialize ignored");
            return false;
        }

        match initial_context.map(str::trim).filter(|c| !c.is_empty()) {
            Some(context) => {
                self.messages.push(ChatMessage::ai(context_seed(context)));
                self.context = Some(context.to_string());
                self.seed = Some(SeedKind::Context);
            }
            None => {
                self.messages.push(ChatMessage::ai(GREETING));
                self.seed = Some(SeedKind::Greeting);
            }
        }

        info!(seed = ?self.seed, "Transcript initialized");
        true
    }

    /// Decode a user-selected image into the pending attachment.
    ///
    /// On failure the pending attachment is cleared and a warning is emitted.
    pub fn attach_image(&mut self, bytes: &[u8]) -> Result<(), AttachmentError> {
        match ImageDataUri::from_bytes(bytes) {
            Ok(image) => {
                debug!(mime = image.mime_type(), size = bytes.len(), "Image attached");
                self.attachment = Some(image);
                Ok(())
            }
            Err(e) => Err(self.attachment_failed(e)),
        }
    }

    /// Read and attach an image from disk.
    pub async fn attach_image_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<(), AttachmentError> {
        match tokio::fs::read(path.as_ref()).await {
            Ok(bytes) => self.attach_image(&bytes),
            Err(e) => Err(self.attachment_failed(e.into())),
        }
    }

    fn attachment_failed(&mut self, error: AttachmentError) -> AttachmentError {
        warn!(error = %error, "Image attachment failed");
        self.attachment = None;
        self.notifier
            .warning(IMAGE_READ_ERROR_TITLE, IMAGE_READ_ERROR_DESCRIPTION);
        error
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    /// Context is forwarded only when the session was opened from DripSeek
    /// context; a greeting-seeded session never sends one.
    fn forwarded_context(&self) -> Option<String> {
        match self.seed {
            Some(SeedKind::Context) => self.context.clone(),
            _ => None,
        }
    }

    /// Start a send: append the user message, clear draft and attachment,
    /// mark the session busy and return the gateway request.
    ///
    /// Returns `None` when there is nothing to send or a send is in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<AssistanceRequest> {
        if self.awaiting_response {
            debug!("Send rejected: a request is already in flight");
            return None;
        }
        if text.trim().is_empty() && self.attachment.is_none() {
            return None;
        }

        let image = self.attachment.take();
        self.messages.push(ChatMessage::user(text, image.clone()));
        self.draft.clear();
        self.awaiting_response = true;

        info!(
            chars = text.len(),
            has_image = image.is_some(),
            "User message appended; awaiting assistant"
        );

        Some(AssistanceRequest {
            question: text.to_string(),
            context: self.forwarded_context(),
            photo_data_uri: image,
        })
    }

    /// Finish a send started with `begin_send`.
    pub fn complete_send(
        &mut self,
        result: Result<AssistanceResponse, GatewayError>,
    ) -> SendOutcome {
        debug_assert!(self.awaiting_response, "complete_send without begin_send");

        let outcome = match result {
            Ok(response) => {
                self.messages.push(ChatMessage::ai(reply_text(&response)));
                SendOutcome::Answered
            }
            Err(e) => {
                warn!(error = %e, "Assistant request failed; appending fallback reply");
                self.messages.push(ChatMessage::ai(FALLBACK_REPLY));
                self.notifier.error(AI_ERROR_TITLE, e.to_string());
                SendOutcome::Failed
            }
        };

        self.awaiting_response = false;
        outcome
    }

    /// Run a full send cycle against `gateway`.
    pub async fn send(
        &mut self,
        gateway: &dyn FashionGateway,
        text: &str,
    ) -> Option<SendOutcome> {
        let request = self.begin_send(text)?;
        let result = with_timeout(
            self.request_timeout,
            gateway.answer_fashion_question(request),
        )
        .await;
        Some(self.complete_send(result))
    }

    /// Send whatever is in the draft.
    pub async fn send_draft(&mut self, gateway: &dyn FashionGateway) -> Option<SendOutcome> {
        let text = self.draft.clone();
        self.send(gateway, &text).await
    }

    pub fn snapshot(&self) -> TranscriptSnapshot {
        TranscriptSnapshot {
            messages: self.messages.clone(),
            draft: self.draft.clone(),
            attachment: self.attachment.clone(),
            awaiting_response: self.awaiting_response,
            context: self.context.clone(),
        }
    }
}
