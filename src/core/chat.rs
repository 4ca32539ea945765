//! # Chat Widget
//!
//! Transcript plus the send state machine. The widget never talks to the
//! network: `submit` hands back a [`SendRequest`] for the host to execute,
//! and the host feeds results back through `apply_fragment`,
//! `finish_stream` or `fail`.
//!
//! ```text
//!            submit / SendMessage
//!   Idle ─────────────────────────▶ AwaitingFirstToken
//!    ▲                                     │ fragment
//!    │ finish_stream                       ▼
//!    ├──────────────────────────────── Streaming ◀─┐
//!    │                                     └───────┘ fragment
//!    │ fail (any state)
//!    └──────────── ErrorDisplayed ◀──────────────────
//! ```
//!
//! `reset_with_opening` may arrive in any state and replaces the transcript
//! wholesale.

use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::content::SUGGESTIONS;

/// Appended when a send fails before its fragment stream could start.
pub const CHAT_ERROR_MESSAGE: &str = "Error connecting to AI.";

/// Suggestion chips are shown only while the transcript is shorter than this.
const SUGGESTION_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// More fragments are expected. Cleared exactly once.
    pub streaming: bool,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>, streaming: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            streaming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatPhase {
    #[default]
    Idle,
    AwaitingFirstToken,
    Streaming,
    ErrorDisplayed,
}

/// What the host must send after an accepted submit. `reply_id` names the
/// placeholder that fragments are applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub reply_id: Uuid,
    pub text: String,
}

/// Requests other sections make of the chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTrigger {
    /// Behaves exactly like the visitor typing `text` and pressing Enter.
    SendMessage(String),
    /// Replaces the whole transcript with one assistant message.
    OpenWithGreeting(String),
}

#[derive(Debug)]
pub struct ChatWidget {
    messages: Vec<ChatMessage>,
    phase: ChatPhase,
    in_flight: Option<Uuid>,
    last_error_displayed: bool,
}

impl ChatWidget {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::new(Role::Assistant, greeting, false)],
            phase: ChatPhase::Idle,
            in_flight: None,
            last_error_displayed: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// True while a send is in flight and submits are disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            ChatPhase::AwaitingFirstToken | ChatPhase::Streaming
        )
    }

    /// Whether the most recent send went through `ErrorDisplayed`.
    pub fn last_error_displayed(&self) -> bool {
        self.last_error_displayed
    }

    /// Quick replies to offer, or an empty slice when none apply.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.messages.len() < SUGGESTION_THRESHOLD && !self.is_busy() {
            SUGGESTIONS
        } else {
            &[]
        }
    }

    /// Starts a send. Rejected (returns `None`, transcript unchanged) when
    /// `text` is blank or another send is in flight.
    pub fn submit(&mut self, text: &str) -> Option<SendRequest> {
        let text = text.trim();
        if text.is_empty() {
            debug!("Rejected empty submit");
            return None;
        }
        if self.is_busy() {
            debug!("Rejected submit while {:?}", self.phase);
            return None;
        }

        self.messages.push(ChatMessage::new(Role::User, text, false));
        let placeholder = ChatMessage::new(Role::Assistant, String::new(), true);
        let reply_id = placeholder.id;
        self.messages.push(placeholder);

        self.phase = ChatPhase::AwaitingFirstToken;
        self.in_flight = Some(reply_id);
        self.last_error_displayed = false;
        info!("Chat submit accepted (reply_id={})", reply_id);

        Some(SendRequest {
            reply_id,
            text: text.to_string(),
        })
    }

    fn placeholder_mut(&mut self, id: Uuid) -> Option<&mut ChatMessage> {
        if self.in_flight != Some(id) {
            return None;
        }
        self.messages
            .iter_mut()
            .rev()
            .find(|m| m.id == id && m.streaming)
    }

    /// Appends one fragment to the in-flight reply. Returns `false` for a
    /// stale id.
    pub fn apply_fragment(&mut self, id: Uuid, fragment: &str) -> bool {
        let Some(message) = self.placeholder_mut(id) else {
            debug!("Dropping fragment for stale reply {}", id);
            return false;
        };
        message.text.push_str(fragment);
        self.phase = ChatPhase::Streaming;
        true
    }

    /// Closes the in-flight reply after its last fragment.
    pub fn finish_stream(&mut self, id: Uuid) -> bool {
        let Some(message) = self.placeholder_mut(id) else {
            debug!("Ignoring finish for stale reply {}", id);
            return false;
        };
        message.streaming = false;
        self.in_flight = None;
        self.phase = ChatPhase::Idle;
        true
    }

    /// The send failed before or outside its fragment stream.
    pub fn fail(&mut self, id: Uuid) -> bool {
        if self.in_flight != Some(id) {
            debug!("Ignoring failure for stale reply {}", id);
            return false;
        }
        warn!("Chat send failed (reply_id={})", id);

        // The placeholder stays in the transcript, empty or not
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.streaming = false;
        }

        self.phase = ChatPhase::ErrorDisplayed;
        self.messages
            .push(ChatMessage::new(Role::Assistant, CHAT_ERROR_MESSAGE, false));
        self.last_error_displayed = true;
        self.in_flight = None;
        self.phase = ChatPhase::Idle;
        true
    }

    /// Abandons the in-flight reply, keeping whatever text it has.
    /// Returns the id the host should cancel.
    pub fn cancel_in_flight(&mut self) -> Option<Uuid> {
        let id = self.in_flight.take()?;
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.streaming = false;
        }
        self.phase = ChatPhase::Idle;
        info!("Chat reply {} cancelled", id);
        Some(id)
    }

    /// Replaces the transcript with a single assistant message. Any
    /// in-flight reply is cancelled and its id returned.
    pub fn reset_with_opening(&mut self, text: impl Into<String>) -> Option<Uuid> {
        let cancelled = self.cancel_in_flight();
        self.messages = vec![ChatMessage::new(Role::Assistant, text, false)];
        self.last_error_displayed = false;
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ChatWidget {
        ChatWidget::new("Hi there")
    }

    #[test]
    fn test_new_seeds_greeting() {
        let chat = widget();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::Assistant);
        assert_eq!(chat.messages()[0].text, "Hi there");
        assert_eq!(chat.phase(), ChatPhase::Idle);
    }

    #[test]
    fn test_blank_submit_is_rejected() {
        let mut chat = widget();
        assert!(chat.submit("   \n\t ").is_none());
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.phase(), ChatPhase::Idle);
    }

    #[test]
    fn test_submit_appends_user_and_placeholder() {
        let mut chat = widget();
        let request = chat.submit("  Hello  ").unwrap();

        assert_eq!(request.text, "Hello");
        assert_eq!(chat.phase(), ChatPhase::AwaitingFirstToken);
        assert!(chat.is_busy());

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].text, "Hello");
        assert_eq!(messages[2].id, request.reply_id);
        assert!(messages[2].streaming);
        assert!(messages[2].text.is_empty());
    }

    #[test]
    fn test_submit_while_busy_is_noop() {
        let mut chat = widget();
        let first = chat.submit("one").unwrap();
        assert!(chat.submit("two").is_none());

        chat.apply_fragment(first.reply_id, "partial");
        assert_eq!(chat.phase(), ChatPhase::Streaming);
        assert!(chat.submit("three").is_none());
        assert_eq!(chat.messages().len(), 3);
    }

    #[test]
    fn test_fragments_concatenate_in_arrival_order() {
        let fragments = ["The", " quick", " brown", "", " fox"];
        let mut chat = widget();
        let request = chat.submit("go").unwrap();

        for (i, fragment) in fragments.iter().enumerate() {
            assert!(chat.apply_fragment(request.reply_id, fragment));
            let reply = chat.messages().last().unwrap();
            assert!(reply.streaming, "cleared early at fragment {i}");
        }
        assert!(chat.finish_stream(request.reply_id));

        let reply = chat.messages().last().unwrap();
        assert_eq!(reply.text, fragments.concat());
        assert!(!reply.streaming);
        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_fallback_fragment_run_on() {
        let mut chat = widget();
        let request = chat.submit("Hi").unwrap();
        for fragment in [
            "Hel",
            "lo",
            crate::inference::service::STREAM_FALLBACK,
        ] {
            chat.apply_fragment(request.reply_id, fragment);
        }
        chat.finish_stream(request.reply_id);

        let reply = chat.messages().last().unwrap();
        assert_eq!(
            reply.text,
            "HelloI'm sorry, I'm having trouble connecting to my brain right now. Please check the API key or try again later."
        );
        assert!(!reply.streaming);
    }

    #[test]
    fn test_stale_ids_are_ignored() {
        let mut chat = widget();
        let request = chat.submit("Hi").unwrap();
        let stale = Uuid::new_v4();

        assert!(!chat.apply_fragment(stale, "x"));
        assert!(!chat.finish_stream(stale));
        assert!(!chat.fail(stale));
        assert_eq!(chat.phase(), ChatPhase::AwaitingFirstToken);

        chat.finish_stream(request.reply_id);
        assert!(!chat.apply_fragment(request.reply_id, "late"));
        assert_eq!(chat.messages().last().unwrap().text, "");
    }

    #[test]
    fn test_fail_appends_error_and_returns_to_idle() {
        let mut chat = widget();
        let request = chat.submit("Hi").unwrap();
        assert!(chat.fail(request.reply_id));

        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert!(chat.last_error_displayed());
        let messages = chat.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].text, "Hi");
        assert_eq!(messages[2].id, request.reply_id);
        assert_eq!(messages[2].text, "");
        assert_eq!(messages[3].text, CHAT_ERROR_MESSAGE);
        assert!(messages.iter().all(|m| !m.streaming));

        // Submits work again and clear the error marker.
        assert!(chat.submit("again").is_some());
        assert!(!chat.last_error_displayed());
    }

    #[test]
    fn test_fail_keeps_partial_reply() {
        let mut chat = widget();
        let request = chat.submit("Hi").unwrap();
        chat.apply_fragment(request.reply_id, "Par");
        chat.fail(request.reply_id);

        let texts: Vec<_> = chat.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Hi there", "Hi", "Par", CHAT_ERROR_MESSAGE]);
    }

    #[test]
    fn test_reset_with_opening_always_leaves_one_message() {
        let mut chat = widget();
        for i in 0..5 {
            let request = chat.submit(&format!("q{i}")).unwrap();
            chat.apply_fragment(request.reply_id, "a");
            chat.finish_stream(request.reply_id);
        }
        assert_eq!(chat.messages().len(), 11);

        assert_eq!(chat.reset_with_opening("Paste the JD"), None);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, "Paste the JD");
        assert_eq!(chat.messages()[0].role, Role::Assistant);
    }

    #[test]
    fn test_reset_mid_stream_cancels_reply() {
        let mut chat = widget();
        let request = chat.submit("Hi").unwrap();
        chat.apply_fragment(request.reply_id, "Hel");

        assert_eq!(chat.reset_with_opening("Fresh"), Some(request.reply_id));
        assert_eq!(chat.phase(), ChatPhase::Idle);
        assert_eq!(chat.messages().len(), 1);
        assert!(!chat.apply_fragment(request.reply_id, "lo"));
        assert_eq!(chat.messages()[0].text, "Fresh");
    }

    #[test]
    fn test_cancel_in_flight_closes_placeholder() {
        let mut chat = widget();
        assert_eq!(chat.cancel_in_flight(), None);

        let request = chat.submit("Hi").unwrap();
        chat.apply_fragment(request.reply_id, "Hel");
        assert_eq!(chat.cancel_in_flight(), Some(request.reply_id));

        let reply = chat.messages().last().unwrap();
        assert_eq!(reply.text, "Hel");
        assert!(!reply.streaming);
        assert!(!chat.is_busy());
    }

    #[test]
    fn test_suggestions_only_early_and_idle() {
        let mut chat = widget();
        assert_eq!(chat.suggestions().len(), 4);

        let request = chat.submit("Hi").unwrap();
        assert!(chat.suggestions().is_empty());

        chat.finish_stream(request.reply_id);
        // Greeting + user + reply = 3 messages.
        assert!(chat.suggestions().is_empty());

        chat.reset_with_opening("Hello again");
        assert_eq!(chat.suggestions(), SUGGESTIONS);
    }
}
