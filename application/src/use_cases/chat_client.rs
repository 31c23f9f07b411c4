//! Chat session client.
//!
//! Wraps an [`LlmGateway`] and owns at most one conversation context. The
//! context is created lazily on the first message, with a system
//! instruction built from the profile *at that moment*. Later profile edits
//! do not reach the context until [`ChatSessionClient::reset_chat`] drops it.

use crate::config::ChatSettings;
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, SessionConfig, StreamHandle};
use bizbrain_domain::{BusinessProfile, ConsultantPrompt, Message, preview};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

struct ActiveContext {
    session: Box<dyn LlmSession>,
    system_instruction: String,
}

/// Client for the remote streaming chat API.
///
/// Does not serialize callers: two concurrent `stream_chat` calls would both
/// be sent to the same context. Keeping one exchange in flight is the
/// controller's job.
pub struct ChatSessionClient {
    gateway: Arc<dyn LlmGateway>,
    settings: ChatSettings,
    context: Mutex<Option<ActiveContext>>,
}

impl ChatSessionClient {
    pub fn new(gateway: Arc<dyn LlmGateway>, settings: ChatSettings) -> Self {
        Self {
            gateway,
            settings,
            context: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Send `text` to the active conversation context, creating it first if
    /// needed, and return the fragment stream.
    ///
    /// `history` is not replayed: the context already holds earlier turns.
    pub async fn stream_chat(
        &self,
        text: &str,
        profile: &BusinessProfile,
        history: &[Message],
    ) -> Result<StreamHandle, GatewayError> {
        let mut context = self.context.lock().await;

        if context.is_none() {
            let system_instruction = ConsultantPrompt::system_instruction(profile);
            let config = SessionConfig {
                model: self.settings.model.clone(),
                system_instruction: system_instruction.clone(),
                temperature: self.settings.temperature,
            };
            info!(model = %config.model, "Creating conversation context");
            let session = self.gateway.create_session(&config).await?;
            *context = Some(ActiveContext {
                session,
                system_instruction,
            });
        }

        let Some(active) = context.as_ref() else {
            return Err(GatewayError::TransportClosed);
        };

        debug!(
            history = history.len(),
            text = %preview(text, 80),
            "Sending message to conversation context"
        );
        active.session.send_streaming(text).await
    }

    /// Drop the conversation context; the next message rebuilds it from the
    /// then-current profile.
    pub async fn reset_chat(&self) {
        if self.context.lock().await.take().is_some() {
            info!("Conversation context reset");
        }
    }

    pub async fn has_active_session(&self) -> bool {
        self.context.lock().await.is_some()
    }

    /// The system instruction the active context was created with.
    pub async fn current_system_instruction(&self) -> Option<String> {
        self.context
            .lock()
            .await
            .as_ref()
            .map(|active| active.system_instruction.clone())
    }
}
