//! # Chat Service
//!
//! The one place that knows how portfolio chat talks to a
//! [`GenerativeProvider`]. Two operations are exposed:
//!
//! - [`ChatService::send_one_shot`]: stateless prompt → text. It never fails.
//!   Provider trouble turns into fallback text.
//! - [`ChatService::send_stream`]: message → lazy stream of reply fragments,
//!   replayed against a persistent [`ChatSession`].
//!
//! ```text
//!   send_stream(msg, cancel)
//!        │
//!        ▼
//!   ┌──────────────┐  StreamChunk   ┌──────────────┐  String   ┌────────────┐
//!   │   provider   │ ─────────────▶ │   producer   │ ────────▶ │  consumer  │
//!   │ (HTTP / SSE) │   (bounded)    │ (tokio task) │ (bounded) │  (widget)  │
//!   └──────────────┘                └──────────────┘           └────────────┘
//!                                         │ on success: commit turn pair
//!                                         ▼
//!                                   ChatSession.history
//! ```
//!
//! The service is constructed explicitly and shared by `Arc`. It lives
//! until [`ChatService::dispose`] or drop.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::ReceiverStream;

use crate::core::content;
use crate::inference::{GenerationRequest, GenerativeProvider, StreamChunk, Turn};

/// Sent as the last fragment when a streamed reply fails.
pub const STREAM_FALLBACK: &str = "I'm sorry, I'm having trouble connecting to my brain right now. Please check the API key or try again later.";
/// Returned by a one-shot call when the provider answers with no text.
pub const EMPTY_RESPONSE_FALLBACK: &str = "No response generated.";
/// Returned by a one-shot call when the provider cannot be reached.
pub const ONE_SHOT_FAILURE_FALLBACK: &str = "System error: Unable to generate content at this time.";
/// System instruction for one-shot calls.
pub const ONE_SHOT_INSTRUCTION: &str =
    "You are a helpful AI assistant embedded in a portfolio website.";

/// Capacity of the fragment channels between provider, producer and consumer.
const FRAGMENT_BUFFER: usize = 100;

/// The consumer side of a streamed reply.
pub type FragmentStream = ReceiverStream<String>;

// ============================================================================
// Settings & Session
// ============================================================================

/// Fixed request shape for every call the service makes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub model: String,
    pub chat_instruction: String,
    pub one_shot_instruction: String,
    pub temperature: f32,
}

impl ChatSettings {
    /// Settings for the portfolio assistant: the chat instruction describes
    /// the owner, skills, and projects from [`content`].
    pub fn portfolio(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            chat_instruction: content::system_instruction(),
            one_shot_instruction: ONE_SHOT_INSTRUCTION.to_string(),
            temperature,
        }
    }
}

/// Conversation state replayed to the provider on every stream send.
#[derive(Debug)]
pub struct ChatSession {
    /// Distinguishes this session from one created after a reset, so a
    /// stale stream never commits into its successor.
    epoch: u64,
    history: Vec<Turn>,
    system_instruction: String,
    temperature: f32,
}

impl ChatSession {
    fn new(epoch: u64, settings: &ChatSettings) -> Self {
        Self {
            epoch,
            history: Vec::new(),
            system_instruction: settings.chat_instruction.clone(),
            temperature: settings.temperature,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation for one in-flight stream.
///
/// Clones share the same flag. Cancelling is idempotent.
#[derive(Clone, Debug)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives in `self`, so the wait can only end by cancellation.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Failures surfaced by the service itself (not by the provider).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// `dispose()` was called; no further sessions can be opened.
    Disposed,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Disposed => write!(f, "chat service has been disposed"),
        }
    }
}

impl std::error::Error for ServiceError {}

// ============================================================================
// Service
// ============================================================================

pub struct ChatService {
    provider: Arc<dyn GenerativeProvider>,
    settings: ChatSettings,
    session: Arc<Mutex<Option<ChatSession>>>,
    next_epoch: Mutex<u64>,
    disposed: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChatService {
    pub fn new(provider: Arc<dyn GenerativeProvider>, settings: ChatSettings) -> Self {
        info!(
            "Chat service ready: provider={}, model={}",
            provider.name(),
            settings.model
        );
        Self {
            provider,
            settings,
            session: Arc::new(Mutex::new(None)),
            next_epoch: Mutex::new(0),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn has_session(&self) -> bool {
        lock(&self.session).is_some()
    }

    /// Number of committed turns in the current session (0 without one).
    pub fn history_len(&self) -> usize {
        lock(&self.session)
            .as_ref()
            .map_or(0, |s| s.history.len())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Drops the current session; the next stream send opens a fresh one.
    pub fn reset_session(&self) {
        if lock(&self.session).take().is_some() {
            info!("Chat session reset");
        }
    }

    /// Ends the service lifetime: drops the session and refuses new sends.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        lock(&self.session).take();
        info!("Chat service disposed");
    }

    /// Stateless single request. Never fails: empty replies and provider
    /// errors come back as fallback text.
    pub async fn send_one_shot(&self, prompt: &str) -> String {
        let request = GenerationRequest {
            model: &self.settings.model,
            system_instruction: &self.settings.one_shot_instruction,
            history: &[],
            prompt,
            temperature: None,
        };

        match self.provider.generate(request).await {
            Ok(text) if text.is_empty() => EMPTY_RESPONSE_FALLBACK.to_string(),
            Ok(text) => text,
            Err(e) => {
                error!("Error generating content: {}", e);
                ONE_SHOT_FAILURE_FALLBACK.to_string()
            }
        }
    }

    /// Opens the session if needed and returns its epoch plus a snapshot of
    /// the request shape.
    fn checkout_session(&self) -> (u64, Vec<Turn>, String, f32) {
        let mut guard = lock(&self.session);
        let session = guard.get_or_insert_with(|| {
            let mut next = lock(&self.next_epoch);
            *next += 1;
            info!("Creating chat session #{}", *next);
            ChatSession::new(*next, &self.settings)
        });
        (
            session.epoch,
            session.history.clone(),
            session.system_instruction.clone(),
            session.temperature,
        )
    }

    /// Sends `message` within the persistent session and returns the reply
    /// as a stream of fragments.
    ///
    /// The stream yields fragments in generation order and ends when the
    /// provider completes. On provider failure it yields exactly one
    /// [`STREAM_FALLBACK`] fragment and ends. On `cancel` it ends with no
    /// further fragments. The turn pair is committed to the session only on
    /// success.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send_stream(
        &self,
        message: &str,
        cancel: CancelToken,
    ) -> Result<FragmentStream, ServiceError> {
        if self.is_disposed() {
            warn!("send_stream called after dispose");
            return Err(ServiceError::Disposed);
        }

        let (epoch, history, system_instruction, temperature) = self.checkout_session();
        let (out_tx, out_rx) = mpsc::channel::<String>(FRAGMENT_BUFFER);

        let provider = Arc::clone(&self.provider);
        let session = Arc::clone(&self.session);
        let model = self.settings.model.clone();
        let message = message.to_string();

        tokio::spawn(async move {
            let exchange = async {
                let (chunk_tx, mut chunk_rx) = mpsc::channel::<StreamChunk>(FRAGMENT_BUFFER);
                let request = GenerationRequest {
                    model: &model,
                    system_instruction: &system_instruction,
                    history: &history,
                    prompt: &message,
                    temperature: Some(temperature),
                };

                let produce = provider.stream_generate(request, chunk_tx);
                let forward = async {
                    let mut reply = String::new();
                    let mut consumer_alive = true;
                    while let Some(chunk) = chunk_rx.recv().await {
                        match chunk {
                            StreamChunk::Text(text) if text.is_empty() => {}
                            StreamChunk::Text(text) => {
                                reply.push_str(&text);
                                if out_tx.send(text).await.is_err() {
                                    debug!("Fragment consumer dropped");
                                    consumer_alive = false;
                                    break;
                                }
                            }
                            StreamChunk::Completed => debug!("Provider signalled completion"),
                        }
                    }
                    (reply, consumer_alive)
                };

                let (result, (reply, consumer_alive)) = tokio::join!(produce, forward);
                (result, reply, consumer_alive)
            };

            let (result, reply, consumer_alive) = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Stream cancelled");
                    return;
                }
                outcome = exchange => outcome,
            };

            if !consumer_alive {
                return;
            }

            match result {
                Ok(()) => {
                    let mut guard = lock(&session);
                    match guard.as_mut() {
                        Some(s) if s.epoch == epoch => {
                            s.history.push(Turn::user(message.as_str()));
                            s.history.push(Turn::model(reply));
                            debug!("Session #{} now holds {} turns", epoch, s.history.len());
                        }
                        _ => debug!("Session #{} was reset mid-stream; reply not committed", epoch),
                    }
                }
                Err(e) => {
                    error!("Error sending message to Gemini: {}", e);
                    if out_tx.send(STREAM_FALLBACK.to_string()).await.is_err() {
                        debug!("Fallback dropped: consumer gone");
                    }
                }
            }
        });

        Ok(ReceiverStream::new(out_rx))
    }
}

impl Drop for ChatService {
    fn drop(&mut self) {
        debug!("Chat service dropped");
    }
}
