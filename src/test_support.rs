//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::inference::{
    ChatService, ChatSettings, GenerationRequest, GenerativeProvider, ProviderError, StreamChunk,
    Turn,
};

/// How one scripted `stream_generate` call behaves.
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// Send these fragments, then complete.
    Reply(Vec<&'static str>),
    /// Send these fragments, then fail with a network error.
    FailAfter(Vec<&'static str>),
    /// Send these fragments, then never finish.
    Hang(Vec<&'static str>),
}

/// An owned copy of a request the fake received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub model: String,
    pub system_instruction: String,
    pub history: Vec<Turn>,
    pub prompt: String,
    pub temperature: Option<f32>,
}

impl From<GenerationRequest<'_>> for RecordedRequest {
    fn from(request: GenerationRequest<'_>) -> Self {
        Self {
            model: request.model.to_string(),
            system_instruction: request.system_instruction.to_string(),
            history: request.history.to_vec(),
            prompt: request.prompt.to_string(),
            temperature: request.temperature,
        }
    }
}

/// A scripted provider. Stream calls consume scripts in order; once they
/// run out, streams complete empty.
#[derive(Default)]
pub struct FakeProvider {
    streams: Mutex<VecDeque<StreamScript>>,
    one_shot: Mutex<Option<Result<String, ProviderError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeProvider {
    pub fn with_streams(scripts: Vec<StreamScript>) -> Self {
        Self {
            streams: Mutex::new(scripts.into()),
            ..Default::default()
        }
    }

    pub fn with_one_shot(result: Result<String, ProviderError>) -> Self {
        Self {
            one_shot: Mutex::new(Some(result)),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn send_all(
    sender: &Sender<StreamChunk>,
    fragments: Vec<&'static str>,
) -> Result<(), ProviderError> {
    for fragment in fragments {
        sender
            .send(StreamChunk::Text(fragment.to_string()))
            .await
            .map_err(|_| ProviderError::ChannelClosed)?;
    }
    Ok(())
}

#[async_trait]
impl GenerativeProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(request.into());
        self.one_shot
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn stream_generate(
        &self,
        request: GenerationRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        self.requests.lock().unwrap().push(request.into());
        let script = self.streams.lock().unwrap().pop_front();

        match script {
            None => {}
            Some(StreamScript::Reply(fragments)) => send_all(&sender, fragments).await?,
            Some(StreamScript::FailAfter(fragments)) => {
                send_all(&sender, fragments).await?;
                return Err(ProviderError::Network("scripted failure".into()));
            }
            Some(StreamScript::Hang(fragments)) => {
                send_all(&sender, fragments).await?;
                std::future::pending::<()>().await;
            }
        }
        sender
            .send(StreamChunk::Completed)
            .await
            .map_err(|_| ProviderError::ChannelClosed)
    }
}

pub fn test_service(provider: Arc<FakeProvider>) -> Arc<ChatService> {
    Arc::new(ChatService::new(
        provider,
        ChatSettings::portfolio("test-model", 0.7),
    ))
}

/// Creates a test App backed by an unscripted FakeProvider.
pub fn test_app() -> App {
    App::new(
        test_service(Arc::new(FakeProvider::default())),
        "test-model".to_string(),
        Instant::now(),
    )
}
