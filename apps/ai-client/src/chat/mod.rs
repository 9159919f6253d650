//! Chat session controller.
//!
//! Owns the transcript for one conversation and drives the send/receive
//! lifecycle of a turn: `Idle -> Sending -> Streaming -> Idle`. A failed or
//! cancelled turn rolls back the in-progress assistant message wholesale;
//! the user's message and all prior transcript content stay.

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::ChatMessage;

pub mod stream;

use stream::DeltaAssembler;

/// Shown when the chat endpoint fails without a usable error body.
const CHAT_FALLBACK_MESSAGE: &str = "Failed to send message. Please try again.";

/// Error body shape of the chat endpoint: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct RemoteChatError {
    error: String,
}

/// Lifecycle state of the current turn. At most one turn is in flight per
/// session; `Sending`/`Streaming` reject further sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Sending,
    Streaming,
}

/// One conversation: an ordered, append-only transcript plus the state of
/// the single in-flight turn. Created when a conversation view opens,
/// dropped when it closes; nothing is persisted.
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: TurnState,
    revision: watch::Sender<u64>,
}

impl ChatSession {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        ChatSession {
            messages: Vec::new(),
            state: TurnState::Idle,
            revision,
        }
    }

    /// A session seeded with an opening assistant message.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.messages.push(ChatMessage::assistant(greeting));
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Observes transcript changes: the revision counter bumps on every
    /// append, so a UI can re-render incrementally while a turn streams.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Rollback guard for one turn. Unless `commit` is called, dropping the
/// guard — on an error return or because the caller cancelled the future
/// mid-stream — removes the assistant placeholder and restores `Idle`.
struct TurnGuard<'a> {
    session: &'a mut ChatSession,
    placeholder: bool,
    committed: bool,
}

impl TurnGuard<'_> {
    /// First 2xx byte of the reply: create the empty assistant message
    /// that all subsequent deltas append to.
    fn start_streaming(&mut self) {
        self.session.state = TurnState::Streaming;
        self.session.messages.push(ChatMessage::assistant(""));
        self.placeholder = true;
        self.session.notify();
    }

    fn append_delta(&mut self, delta: &str) {
        if let Some(last) = self.session.messages.last_mut() {
            last.content.push_str(delta);
        }
        self.session.notify();
    }

    fn commit(mut self) {
        self.committed = true;
        self.session.state = TurnState::Idle;
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if self.placeholder {
            // Partial AI output is never presented as complete: the whole
            // in-progress assistant message goes, nothing before it does.
            self.session.messages.pop();
            self.session.notify();
        }
        self.session.state = TurnState::Idle;
    }
}

/// HTTP client for the streaming career-chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ChatClient {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let mut client = Self::new(config.chat_api_url.clone());
        client.api_key = config.chat_api_key.clone();
        client
    }

    /// Sends one user message and streams the assistant's reply into the
    /// session transcript.
    ///
    /// Preconditions: `text` must be non-empty after trimming, and no other
    /// turn may be in flight for this session — both are `Validation`
    /// errors that leave the transcript untouched.
    pub async fn send_message(
        &self,
        session: &mut ChatSession,
        text: &str,
    ) -> Result<(), ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ApiError::Validation("message text is empty".to_string()));
        }
        if session.state != TurnState::Idle {
            return Err(ApiError::Validation(
                "a turn is already in flight for this session".to_string(),
            ));
        }

        session.messages.push(ChatMessage::user(text));
        session.state = TurnState::Sending;
        session.notify();

        let mut turn = TurnGuard {
            session,
            placeholder: false,
            committed: false,
        };

        match self.run_turn(&mut turn).await {
            Ok(()) => {
                turn.commit();
                Ok(())
            }
            Err(err) => {
                warn!("chat turn failed, rolling back assistant message: {err}");
                Err(err)
            }
        }
    }

    async fn run_turn(&self, turn: &mut TurnGuard<'_>) -> Result<(), ApiError> {
        // The whole prior transcript, including the just-appended user
        // message, is the model's context.
        let body = json!({ "messages": turn.session.messages });

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match status.as_u16() {
                429 => "Rate limit exceeded. Please try again in a moment.".to_string(),
                402 => "AI service unavailable. Please contact support.".to_string(),
                _ => serde_json::from_str::<RemoteChatError>(&body)
                    .map(|e| e.error)
                    .unwrap_or_else(|_| CHAT_FALLBACK_MESSAGE.to_string()),
            };
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        turn.start_streaming();

        let mut assembler = DeltaAssembler::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            for delta in assembler.push_chunk(&chunk) {
                turn.append_delta(&delta);
            }
        }
        for delta in assembler.finish() {
            turn.append_delta(&delta);
        }

        if !assembler.saw_done() {
            // Soft completion: an early close without the sentinel is
            // indistinguishable from "the assistant said nothing".
            debug!("chat stream closed without [DONE] sentinel");
        }
        Ok(())
    }
}
