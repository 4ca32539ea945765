use folio::inference::{
    GeminiProvider, GenerationRequest, GenerativeProvider, ProviderError, StreamChunk, Turn,
};
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

// ============================================================================
// Helper Functions
// ============================================================================

const MODEL: &str = "test-model";

fn request<'a>(history: &'a [Turn], prompt: &'a str) -> GenerationRequest<'a> {
    GenerationRequest {
        model: MODEL,
        system_instruction: "You are a test assistant.",
        history,
        prompt,
        temperature: Some(0.7),
    }
}

/// One SSE event carrying a single text part.
fn sse_event(text: &str) -> String {
    let payload = json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    });
    format!("data: {payload}\r\n\r\n")
}

/// Collects every chunk sent to the channel.
async fn collect_chunks(mut receiver: mpsc::Receiver<StreamChunk>) -> Vec<StreamChunk> {
    let mut chunks = Vec::new();
    while let Some(chunk) = receiver.recv().await {
        chunks.push(chunk);
    }
    chunks
}

// ============================================================================
// streamGenerateContent
// ============================================================================

#[tokio::test]
async fn test_stream_success_yields_fragments_in_order() {
    let mock_server = MockServer::start().await;
    let body = [sse_event("Hello"), sse_event(" world")].concat();

    Mock::given(method("POST"))
        .and(path("/models/test-model:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let (tx, rx) = mpsc::channel(100);
    let result = provider.stream_generate(request(&[], "Hi"), tx).await;

    assert!(result.is_ok());
    assert_eq!(
        collect_chunks(rx).await,
        vec![
            StreamChunk::Text("Hello".into()),
            StreamChunk::Text(" world".into()),
            StreamChunk::Completed,
        ]
    );
}

#[tokio::test]
async fn test_stream_replays_history_and_system_instruction() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:streamGenerateContent"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are a test assistant." }] },
            "contents": [
                { "role": "user", "parts": [{ "text": "Hi" }] },
                { "role": "model", "parts": [{ "text": "Hello!" }] },
                { "role": "user", "parts": [{ "text": "Tell me more" }] }
            ],
            "generationConfig": { "temperature": 0.7 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(sse_event("Sure")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let history = vec![Turn::user("Hi"), Turn::model("Hello!")];
    let (tx, rx) = mpsc::channel(100);
    let result = provider
        .stream_generate(request(&history, "Tell me more"), tx)
        .await;

    assert!(result.is_ok());
    assert_eq!(collect_chunks(rx).await[0], StreamChunk::Text("Sure".into()));
}

#[tokio::test]
async fn test_stream_http_error_is_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let (tx, rx) = mpsc::channel(100);
    let result = provider.stream_generate(request(&[], "Hi"), tx).await;

    assert_eq!(
        result,
        Err(ProviderError::Api {
            status: 429,
            message: "quota exceeded".into()
        })
    );
    assert!(collect_chunks(rx).await.is_empty());
}

#[tokio::test]
async fn test_stream_inline_error_after_fragment() {
    let mock_server = MockServer::start().await;
    let body = format!(
        "{}data: {}\r\n\r\n",
        sse_event("partial"),
        json!({ "error": { "code": 500, "message": "internal" } })
    );

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let (tx, rx) = mpsc::channel(100);
    let result = provider.stream_generate(request(&[], "Hi"), tx).await;

    assert!(matches!(result, Err(ProviderError::Api { status: 500, .. })));
    assert_eq!(
        collect_chunks(rx).await,
        vec![StreamChunk::Text("partial".into())]
    );
}

#[tokio::test]
async fn test_stream_without_trailing_newline() {
    let mock_server = MockServer::start().await;
    let body = sse_event("last").trim_end().to_string();

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let (tx, rx) = mpsc::channel(100);
    provider
        .stream_generate(request(&[], "Hi"), tx)
        .await
        .unwrap();

    assert_eq!(
        collect_chunks(rx).await,
        vec![StreamChunk::Text("last".into()), StreamChunk::Completed]
    );
}

/// Serves `body` as a chunked SSE response, one HTTP chunk per part, with a
/// pause between parts so the client sees them as separate reads.
async fn serve_split_body(parts: Vec<Vec<u8>>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Drain the request head and its Content-Length body
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + length || n == 0 {
                    break;
                }
            } else if n == 0 {
                break;
            }
        }

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\n\
                  transfer-encoding: chunked\r\nconnection: close\r\n\r\n",
            )
            .await
            .unwrap();
        for part in parts {
            socket
                .write_all(format!("{:x}\r\n", part.len()).as_bytes())
                .await
                .unwrap();
            socket.write_all(&part).await.unwrap();
            socket.write_all(b"\r\n").await.unwrap();
            socket.flush().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        socket.write_all(b"0\r\n\r\n").await.unwrap();
        socket.flush().await.unwrap();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_stream_keeps_multibyte_character_split_across_reads() {
    let body = sse_event("Minh Vũ").into_bytes();
    // "ũ" is 0xC5 0xA9; cut between the two bytes
    let split = body
        .windows(2)
        .position(|w| w == [0xC5, 0xA9])
        .expect("encoded body contains ũ")
        + 1;
    let parts = vec![body[..split].to_vec(), body[split..].to_vec()];

    let base_url = serve_split_body(parts).await;
    let provider = GeminiProvider::new(Some("test-key".into()), Some(base_url));
    let (tx, rx) = mpsc::channel(100);
    let result = provider.stream_generate(request(&[], "Hi"), tx).await;

    assert!(result.is_ok(), "stream failed: {result:?}");
    let texts: Vec<String> = collect_chunks(rx)
        .await
        .into_iter()
        .filter_map(|chunk| match chunk {
            StreamChunk::Text(text) => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(texts.concat(), "Minh Vũ");
}

#[tokio::test]
async fn test_missing_key_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(None, Some(mock_server.uri()));
    let (tx, _rx) = mpsc::channel(100);
    let result = provider.stream_generate(request(&[], "Hi"), tx).await;

    assert!(matches!(result, Err(ProviderError::Config(_))));
}

// ============================================================================
// generateContent
// ============================================================================

#[tokio::test]
async fn test_generate_returns_visible_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "planning...", "thought": true },
                        { "text": "- one\n" },
                        { "text": "- two" }
                    ]
                },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let text = provider
        .generate(GenerationRequest {
            temperature: None,
            ..request(&[], "Summarize")
        })
        .await
        .unwrap();

    assert_eq!(text, "- one\n- two");
}

#[tokio::test]
async fn test_generate_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::new(Some("test-key".into()), Some(mock_server.uri()));
    let result = provider.generate(request(&[], "Summarize")).await;

    assert!(matches!(result, Err(ProviderError::Api { status: 503, .. })));
}
