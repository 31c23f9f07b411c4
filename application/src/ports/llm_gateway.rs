//! LLM Gateway port
//!
//! Defines the interface for talking to a hosted generative-text API.

use async_trait::async_trait;
use bizbrain_domain::{Model, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations.
///
/// To the user every variant is the same failure ("remote exchange
/// failed"); the variants exist for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Cancelled")]
    Cancelled,
}

/// Parameters fixed for the lifetime of a conversation context.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub model: Model,
    pub system_instruction: String,
    pub temperature: f32,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new conversation context bound to `config.system_instruction`.
    async fn create_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Handle for receiving streaming events from an LLM session.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. Producers use a channel of
/// capacity 1, so at most one fragment is in transit before the consumer
/// asks for the next.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    /// Channel capacity used by every producer.
    pub const CAPACITY: usize = 1;

    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Create a connected sender / handle pair.
    pub fn channel() -> (mpsc::Sender<StreamEvent>, Self) {
        let (tx, rx) = mpsc::channel(Self::CAPACITY);
        (tx, Self::new(rx))
    }

    /// Receive the next event; `None` once the producer is gone.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::RequestFailed(e));
                }
            }
        }
        // Channel closed without Completed — return what we have
        Ok(full_text)
    }
}

/// An active conversation context.
///
/// The context accumulates turn history itself; callers only send the new
/// user text.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a user message and get a streaming reply.
    async fn send_streaming(&self, content: &str) -> Result<StreamHandle, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_text_concatenates_deltas() {
        let (tx, handle) = StreamHandle::channel();
        tokio::spawn(async move {
            for chunk in ["Hello", ", ", "world"] {
                tx.send(StreamEvent::Delta(chunk.to_string())).await.unwrap();
            }
            tx.send(StreamEvent::Completed("Hello, world".to_string()))
                .await
                .unwrap();
        });
        assert_eq!(handle.collect_text().await.unwrap(), "Hello, world");
    }

    #[tokio::test]
    async fn collect_text_surfaces_error() {
        let (tx, handle) = StreamHandle::channel();
        tokio::spawn(async move {
            tx.send(StreamEvent::Delta("partial".to_string())).await.unwrap();
            tx.send(StreamEvent::Error("boom".to_string())).await.unwrap();
        });
        assert_eq!(
            handle.collect_text().await,
            Err(GatewayError::RequestFailed("boom".to_string()))
        );
    }
}
