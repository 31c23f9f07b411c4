//! Gemini conversation context

use crate::gemini::error::{GeminiError, Result};
use crate::gemini::protocol::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, error_message,
};
use crate::gemini::sse::SseDecoder;
use async_trait::async_trait;
use bizbrain_application::ports::llm_gateway::{
    GatewayError, LlmSession, SessionConfig, StreamHandle,
};
use bizbrain_domain::{Model, StreamEvent};
use futures::StreamExt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One conversation context against the Gemini API.
///
/// Holds the turn history locally. A turn (user text + model reply) is
/// recorded only once its stream has completed, so a failed exchange leaves
/// no trace in the context.
pub struct GeminiSession {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: Model,
    system_instruction: String,
    temperature: f32,
    timeout: Option<Duration>,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiSession {
    pub fn new(
        client: reqwest::Client,
        api_base: &str,
        api_key: &str,
        timeout: Option<Duration>,
        config: &SessionConfig,
    ) -> Self {
        let endpoint = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            api_base.trim_end_matches('/'),
            config.model.as_str()
        );
        Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
            timeout,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, content: &str) -> GenerateContentRequest {
        let mut contents = self
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        contents.push(Content::user(content));

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(&self.system_instruction)),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }

    async fn open(&self, request: &GenerateContentRequest) -> Result<reqwest::Response> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(response)
    }
}

/// Forward every text fragment of `response` to `tx`; returns the full reply.
///
/// Stops as soon as the receiver is dropped, even while the server is
/// stalled, so the connection is released.
async fn pump(response: reqwest::Response, tx: &mpsc::Sender<StreamEvent>) -> Result<String> {
    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    let mut reply = String::new();

    loop {
        let chunk = tokio::select! {
            biased;
            _ = tx.closed() => return Err(GeminiError::ReceiverDropped),
            chunk = stream.next() => chunk,
        };
        let Some(chunk) = chunk else { break };
        let chunk = chunk?;
        for payload in decoder.push(&chunk) {
            forward(&payload, &mut reply, tx).await?;
        }
    }
    if let Some(payload) = decoder.finish() {
        forward(&payload, &mut reply, tx).await?;
    }
    Ok(reply)
}

async fn forward(
    payload: &str,
    reply: &mut String,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<()> {
    let response: GenerateContentResponse =
        serde_json::from_str(payload).map_err(|e| GeminiError::Parse {
            error: e.to_string(),
            raw: payload.to_string(),
        })?;

    if let Some(error) = response.error {
        return Err(GeminiError::Api {
            status: error.code.and_then(|c| u16::try_from(c).ok()).unwrap_or(0),
            message: error.describe(),
        });
    }

    let text = response.text();
    if text.is_empty() {
        return Ok(());
    }
    reply.push_str(&text);
    tx.send(StreamEvent::Delta(text))
        .await
        .map_err(|_| GeminiError::ReceiverDropped)
}

#[async_trait]
impl LlmSession for GeminiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_streaming(&self, content: &str) -> std::result::Result<StreamHandle, GatewayError> {
        let request = self.build_request(content);
        debug!(
            model = %self.model,
            turns = request.contents.len(),
            "Opening Gemini stream"
        );

        let response = self.open(&request).await.map_err(|e| {
            warn!(error = %e, "Gemini request failed");
            GatewayError::from(e)
        })?;

        let (tx, handle) = StreamHandle::channel();
        let history = Arc::clone(&self.history);
        let user_turn = Content::user(content);

        tokio::spawn(async move {
            match pump(response, &tx).await {
                Ok(reply) => {
                    info!(bytes = reply.len(), "Gemini stream complete");
                    let model_turn = Content::model(reply.clone());
                    if tx.send(StreamEvent::Completed(reply)).await.is_err() {
                        debug!("Gemini stream abandoned before completion was delivered");
                        return;
                    }
                    let mut history = history.lock().unwrap_or_else(PoisonError::into_inner);
                    history.push(user_turn);
                    history.push(model_turn);
                }
                Err(GeminiError::ReceiverDropped) => {
                    debug!("Gemini stream abandoned by consumer");
                }
                Err(e) => {
                    warn!(error = %e, "Gemini stream failed");
                    let _ = tx.send(StreamEvent::Error(GatewayError::from(e).to_string())).await;
                }
            }
        });

        Ok(handle)
    }
}
