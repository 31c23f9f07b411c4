//! Gemini LLM Gateway implementation

use crate::gemini::session::GeminiSession;
use async_trait::async_trait;
use bizbrain_application::ports::llm_gateway::{
    GatewayError, LlmGateway, LlmSession, SessionConfig,
};
use std::time::Duration;
use tracing::info;

/// Production endpoint of the Generative Language API.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings shared by every session the gateway creates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    /// Per-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn api_key_from_env() -> Option<String> {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
    }
}

/// LLM Gateway implementation for the Gemini REST API
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGateway {
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        if config.api_key.is_empty() {
            info!("No Gemini API key configured; requests will be rejected remotely");
        }
        info!(api_base = %config.api_base, "GeminiGateway initialized");

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn create_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let session = GeminiSession::new(
            self.client.clone(),
            &self.config.api_base,
            &self.config.api_key,
            self.config.timeout,
            config,
        );
        info!(model = %config.model, endpoint = session.endpoint(), "Created Gemini session");
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizbrain_application::ports::llm_gateway::StreamHandle;
    use bizbrain_domain::{Model, StreamEvent};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve each canned `(status, body)` to one connection in turn and
    /// return the request bodies received.
    async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v1beta", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut bodies = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                bodies.push(read_request(&mut socket).await);

                let content_type = if status == 200 {
                    "text/event-stream"
                } else {
                    "application/json"
                };
                let response = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            bodies
        });

        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let head = text[..end].to_ascii_lowercase();
                assert!(head.contains("x-goog-api-key: test-key"));
                assert!(head.contains(":streamgeneratecontent?alt=sse"));
                let length: usize = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .map(|v| v.trim().parse().unwrap())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    return String::from_utf8_lossy(&raw[end + 4..end + 4 + length]).to_string();
                }
            }
            if n == 0 {
                panic!("connection closed before full request");
            }
        }
    }

    fn sse(fragments: &[&str]) -> String {
        fragments
            .iter()
            .map(|f| {
                let payload = serde_json::json!({
                    "candidates": [{"content": {"role": "model", "parts": [{"text": f}]}}]
                });
                format!("data: {payload}\r\n\r\n")
            })
            .collect()
    }

    fn session_config() -> SessionConfig {
        SessionConfig {
            model: Model::Gemini25Flash,
            system_instruction: "You are a consultant".to_string(),
            temperature: 0.7,
        }
    }

    async fn drain(mut handle: StreamHandle) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_streams_fragments_and_replays_history() {
        let (base, server) = serve(vec![
            (200, sse(&["Hello", ", founder"])),
            (200, sse(&["Second"])),
        ])
        .await;
        let gateway =
            GeminiGateway::new(GeminiConfig::new("test-key").with_api_base(base)).unwrap();
        let session = gateway.create_session(&session_config()).await.unwrap();
        assert_eq!(session.model(), &Model::Gemini25Flash);

        let events = drain(session.send_streaming("Hi").await.unwrap()).await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hello".to_string()),
                StreamEvent::Delta(", founder".to_string()),
                StreamEvent::Completed("Hello, founder".to_string()),
            ]
        );

        let events = drain(session.send_streaming("More?").await.unwrap()).await;
        assert_eq!(events.last(), Some(&StreamEvent::Completed("Second".to_string())));

        let bodies = server.await.unwrap();
        let first: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(first["contents"].as_array().unwrap().len(), 1);
        assert_eq!(
            first["systemInstruction"]["parts"][0]["text"],
            "You are a consultant"
        );
        let temperature = first["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);

        let second: serde_json::Value = serde_json::from_str(&bodies[1]).unwrap();
        let contents = second["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Hello, founder");
        assert_eq!(contents[2]["parts"][0]["text"], "More?");
    }

    #[tokio::test]
    async fn test_http_error_fails_before_stream() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        let (base, server) = serve(vec![(400, body.to_string())]).await;
        let gateway =
            GeminiGateway::new(GeminiConfig::new("test-key").with_api_base(base)).unwrap();
        let session = gateway.create_session(&session_config()).await.unwrap();

        let result = session.send_streaming("Hi").await;
        assert_eq!(
            result.err(),
            Some(GatewayError::ApiError {
                status: 400,
                message: "INVALID_ARGUMENT: API key not valid.".to_string()
            })
        );
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_error_payload_mid_stream_is_terminal() {
        let mut body = sse(&["Partial"]);
        body.push_str("data: {\"error\":{\"code\":503,\"message\":\"overloaded\",\"status\":\"UNAVAILABLE\"}}\r\n\r\n");
        let (base, server) = serve(vec![(200, body), (200, sse(&["ok"]))]).await;
        let gateway =
            GeminiGateway::new(GeminiConfig::new("test-key").with_api_base(base)).unwrap();
        let session = gateway.create_session(&session_config()).await.unwrap();

        let events = drain(session.send_streaming("Hi").await.unwrap()).await;
        assert_eq!(events[0], StreamEvent::Delta("Partial".to_string()));
        assert!(matches!(&events[1], StreamEvent::Error(msg) if msg.contains("overloaded")));
        assert_eq!(events.len(), 2);

        // The failed turn is not replayed
        drain(session.send_streaming("Again").await.unwrap()).await;
        let bodies = server.await.unwrap();
        let second: serde_json::Value = serde_json::from_str(&bodies[1]).unwrap();
        assert_eq!(second["contents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_handle_releases_stalled_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v1beta", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let chunk = sse(&["hi"]);
            let head = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nTransfer-Encoding: chunked\r\n\r\n";
            socket.write_all(head.as_bytes()).await.unwrap();
            socket
                .write_all(format!("{:x}\r\n{chunk}\r\n", chunk.len()).as_bytes())
                .await
                .unwrap();
            socket.flush().await.unwrap();

            // Never finish the body; wait for the client to hang up
            let mut buf = [0u8; 1024];
            let hung_up = tokio::time::timeout(Duration::from_secs(5), async {
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(_) => {}
                    }
                }
            })
            .await
            .is_ok();

            let (mut socket, _) = listener.accept().await.unwrap();
            let body = read_request(&mut socket).await;
            let reply = sse(&["again"]);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
                reply.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            (hung_up, body)
        });

        let gateway =
            GeminiGateway::new(GeminiConfig::new("test-key").with_api_base(base)).unwrap();
        let session = gateway.create_session(&session_config()).await.unwrap();

        let mut handle = session.send_streaming("Hi").await.unwrap();
        assert_eq!(handle.next_event().await, Some(StreamEvent::Delta("hi".to_string())));
        drop(handle);

        let events = drain(session.send_streaming("Again").await.unwrap()).await;
        assert_eq!(events.last(), Some(&StreamEvent::Completed("again".to_string())));

        let (hung_up, body) = server.await.unwrap();
        assert!(hung_up);
        // The abandoned turn is not replayed
        let second: serde_json::Value = serde_json::from_str(&body).unwrap();
        let contents = second["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["parts"][0]["text"], "Again");
    }

    #[tokio::test]
    async fn test_connection_refused_is_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v1beta", listener.local_addr().unwrap());
        drop(listener);

        let gateway =
            GeminiGateway::new(GeminiConfig::new("test-key").with_api_base(base)).unwrap();
        let session = gateway.create_session(&session_config()).await.unwrap();
        let result = session.send_streaming("Hi").await;
        assert!(matches!(result, Err(GatewayError::ConnectionError(_))));
    }
}
