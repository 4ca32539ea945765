use serde::{Deserialize, Serialize};

/// Who produced a turn in the conversation history.
///
/// Gemini only knows two roles inside `contents`; the system instruction
/// travels separately on every request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Model,
}

/// One completed turn kept by a chat session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Everything a provider needs to fulfil one generation call.
///
/// `history` holds the prior turns of the session (empty for one-shot
/// calls); `prompt` is the new user turn appended after it.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub system_instruction: &'a str,
    pub history: &'a [Turn],
    pub prompt: &'a str,
    /// `None` leaves sampling at the provider default.
    pub temperature: Option<f32>,
}

/// A piece of a streamed reply.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Incremental reply text, in generation order.
    Text(String),
    /// The provider signalled the end of the reply.
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_serialization() {
        assert_eq!(serde_json::to_string(&TurnRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&TurnRole::Model).unwrap(), "\"model\"");
    }

    #[test]
    fn test_turn_constructors() {
        let user = Turn::user("hi");
        assert_eq!(user.role, TurnRole::User);
        assert_eq!(user.text, "hi");

        let model = Turn::model(String::from("hello"));
        assert_eq!(model.role, TurnRole::Model);
        assert_eq!(model.text, "hello");
    }
}
