pub mod provider;
pub mod providers;
pub mod service;
pub mod types;

pub use provider::{GenerativeProvider, ProviderError};
pub use providers::GeminiProvider;
pub use service::{CancelToken, ChatService, ChatSettings, FragmentStream, ServiceError};
pub use types::{GenerationRequest, StreamChunk, Turn, TurnRole};
