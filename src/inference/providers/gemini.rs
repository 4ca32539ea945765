//! Google Gemini provider over the public REST API.
//!
//! Two endpoints are used:
//! - `models/{model}:generateContent` for one-shot calls
//! - `models/{model}:streamGenerateContent?alt=sse` for streamed chat
//!
//! The API is stateless. Chat history is replayed from
//! `GenerationRequest::history` on every call, and the system instruction
//! travels in `systemInstruction` instead of as a turn.

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::inference::{
    GenerationRequest, GenerativeProvider, ProviderError, StreamChunk, Turn, TurnRole,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ============================================================================
// Gemini REST Types
// ============================================================================

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Part {
    text: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: &str) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

/// Request body shared by both endpoints.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// One `GenerateContentResponse`: the full body for `generateContent`, or a
/// single SSE `data:` payload for the streaming endpoint.
#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    /// Thought summaries are not part of the visible reply.
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug, Default)]
struct ApiError {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

impl GenerateContentResponse {
    /// Visible text of the first candidate, concatenated across parts.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

// ============================================================================
// Translation Layer
// ============================================================================

fn turn_role(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
    }
}

/// Builds the wire request: session history followed by the new user turn.
fn build_request(request: &GenerationRequest<'_>) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|Turn { role, text }| Content::text(Some(turn_role(*role)), text))
        .collect();
    contents.push(Content::text(Some("user"), request.prompt));

    GenerateContentRequest {
        system_instruction: Content::text(None, request.system_instruction),
        contents,
        generation_config: request
            .temperature
            .map(|temperature| GenerationConfig { temperature }),
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Gemini REST provider.
pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    ///
    /// A missing key does not fail construction. It is logged here, and each
    /// call then fails fast with `ProviderError::Config`.
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            error!("Gemini API key is missing from config and environment");
        }
        Self {
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Posts a request body to `models/{model}:{method}` and returns the
    /// response once the status line is known to be successful.
    async fn post(
        &self,
        model: &str,
        method: &str,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Config("Gemini API key is not set".to_string()))?;

        let json_body = serde_json::to_string(body)
            .map_err(|e| ProviderError::Parse(format!("Request serialization failed: {e}")))?;
        debug!("Raw Gemini request: {}", json_body);

        let url = format!("{}/models/{}:{}", self.base_url, model, method);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .body(json_body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        debug!("Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Gemini API error: {} - {}", status, err_body);
            return Err(ProviderError::Api {
                status,
                message: err_body,
            });
        }

        Ok(response)
    }
}

fn decode_line(raw: &[u8]) -> Result<&str, ProviderError> {
    std::str::from_utf8(raw).map_err(|e| ProviderError::Parse(format!("Invalid UTF-8 in stream: {e}")))
}

/// Visible text carried by one SSE line. `None` for non-data lines and
/// events without text.
fn event_text(line: &str) -> Result<Option<String>, ProviderError> {
    let Some(data) = line.strip_prefix("data:").map(str::trim_start) else {
        return Ok(None);
    };
    if data.is_empty() {
        return Ok(None);
    }
    let event = parse_stream_event(data)?;
    if let Some(reason) = event.finish_reason() {
        debug!("Gemini finish reason: {}", reason);
    }
    let text = event.text();
    Ok((!text.is_empty()).then_some(text))
}

/// Parses one SSE `data:` payload, surfacing in-band errors.
fn parse_stream_event(data: &str) -> Result<GenerateContentResponse, ProviderError> {
    let event: GenerateContentResponse =
        serde_json::from_str(data).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if let Some(err) = event.error {
        return Err(ProviderError::Api {
            status: err.code,
            message: err.message,
        });
    }
    Ok(event)
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, ProviderError> {
        let body = build_request(&request);
        info!(
            "Gemini generateContent: model={}, prompt_len={}",
            request.model,
            request.prompt.len()
        );

        let response = self.post(request.model, "generateContent", &body).await?;
        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|e| ProviderError::Parse(e.to_string()))?;
        if let Some(err) = parsed.error {
            return Err(ProviderError::Api {
                status: err.code,
                message: err.message,
            });
        }
        Ok(parsed.text())
    }

    async fn stream_generate(
        &self,
        request: GenerationRequest<'_>,
        sender: Sender<StreamChunk>,
    ) -> Result<(), ProviderError> {
        let body = build_request(&request);
        info!(
            "Gemini streamGenerateContent: model={}, history={}, temperature={:?}",
            request.model,
            request.history.len(),
            request.temperature
        );

        let mut response = self
            .post(request.model, "streamGenerateContent?alt=sse", &body)
            .await?;

        // Raw bytes: a multi-byte character may straddle two network chunks
        let mut buffer: Vec<u8> = Vec::new();
        let mut fragment_count = 0usize;
        let mut total_len = 0usize;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?
        {
            buffer.extend_from_slice(&chunk);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = buffer.drain(..=pos).collect();
                let line = decode_line(&raw)?;
                if let Some(text) = event_text(line.trim())? {
                    fragment_count += 1;
                    total_len += text.len();
                    if sender.send(StreamChunk::Text(text)).await.is_err() {
                        warn!("Fragment send failed: receiver dropped");
                        return Err(ProviderError::ChannelClosed);
                    }
                }
            }
        }

        // A final event without a trailing newline is still a complete line.
        let tail = decode_line(&buffer)?;
        if let Some(text) = event_text(tail.trim())? {
            fragment_count += 1;
            total_len += text.len();
            if sender.send(StreamChunk::Text(text)).await.is_err() {
                return Err(ProviderError::ChannelClosed);
            }
        }

        info!(
            "Gemini stream complete: {} fragments, {} bytes",
            fragment_count, total_len
        );
        if sender.send(StreamChunk::Completed).await.is_err() {
            warn!("Completed send failed: receiver dropped");
            return Err(ProviderError::ChannelClosed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request<'a>(history: &'a [Turn], temperature: Option<f32>) -> GenerationRequest<'a> {
        GenerationRequest {
            model: "gemini-test",
            system_instruction: "Be nice.",
            history,
            prompt: "Hello",
            temperature,
        }
    }

    #[test]
    fn test_build_request_appends_prompt_after_history() {
        let history = vec![Turn::user("Hi"), Turn::model("Hey there")];
        let body = build_request(&request(&history, Some(0.7)));

        assert_eq!(body.contents.len(), 3);
        assert_eq!(body.contents[0].role, Some("user"));
        assert_eq!(body.contents[1].role, Some("model"));
        assert_eq!(body.contents[2].role, Some("user"));
        assert_eq!(body.contents[2].parts[0].text, "Hello");
        assert_eq!(body.system_instruction.role, None);
        assert_eq!(body.system_instruction.parts[0].text, "Be nice.");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let body = build_request(&request(&[], Some(0.7)));
        let json = serde_json::to_string(&body).unwrap();

        assert!(json.contains(r#""systemInstruction":{"parts":[{"text":"Be nice."}]}"#));
        assert!(json.contains(r#""generationConfig":{"temperature":0.7}"#));
        assert!(json.contains(r#""contents":[{"role":"user","parts":[{"text":"Hello"}]}]"#));
    }

    #[test]
    fn test_request_omits_generation_config_without_temperature() {
        let body = build_request(&request(&[], None));
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("generationConfig"));
    }

    #[test]
    fn test_response_text_concatenates_parts_and_skips_thoughts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"thinking...","thought":true},
            {"text":"Hel"},
            {"text":"lo"}
        ]},"finishReason":"STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), "Hello");
        assert_eq!(parsed.finish_reason(), Some("STOP"));
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"usageMetadata":{"totalTokenCount":3}}"#).unwrap();
        assert_eq!(parsed.text(), "");
        assert_eq!(parsed.finish_reason(), None);
    }

    #[test]
    fn test_parse_stream_event_surfaces_inline_error() {
        let result = parse_stream_event(
            r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#,
        );
        assert_eq!(
            result.unwrap_err(),
            ProviderError::Api {
                status: 503,
                message: "The model is overloaded.".to_string()
            }
        );
    }

    #[test]
    fn test_parse_stream_event_rejects_garbage() {
        assert!(matches!(
            parse_stream_event("not json"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_decode_line_rejects_invalid_utf8() {
        assert_eq!(decode_line("data: Vũ\n".as_bytes()), Ok("data: Vũ\n"));
        assert!(matches!(
            decode_line(&[b'd', 0xC5]),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let provider = GeminiProvider::new(Some("   ".to_string()), None);
        assert!(!provider.has_api_key());
        assert_eq!(provider.base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let provider =
            GeminiProvider::new(Some("key".to_string()), Some("http://localhost:9/".to_string()));
        assert_eq!(provider.base_url, "http://localhost:9");
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast_with_config_error() {
        let provider = GeminiProvider::new(None, None);
        let result = provider.generate(request(&[], None)).await;
        assert!(matches!(result, Err(ProviderError::Config(_))));
    }
}
