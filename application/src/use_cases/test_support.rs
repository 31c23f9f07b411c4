//! Scripted gateway shared by use-case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession, SessionConfig, StreamHandle};
use async_trait::async_trait;
use bizbrain_domain::{Model, StreamEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What a single `send_streaming` call does.
pub(crate) enum Script {
    /// Emit these events, then close the stream.
    Events(Vec<StreamEvent>),
    /// Fail before any stream is opened.
    FailOpen(GatewayError),
    /// Wait for `gate` to be notified, then emit the events.
    Gated(Arc<Notify>, Vec<StreamEvent>),
    /// Keep the stream open forever without emitting anything.
    Hang,
}

impl Script {
    /// Deltas for each fragment followed by `Completed` with their concatenation.
    pub(crate) fn reply(fragments: &[&str]) -> Self {
        let mut events: Vec<StreamEvent> = fragments
            .iter()
            .map(|f| StreamEvent::Delta(f.to_string()))
            .collect();
        events.push(StreamEvent::Completed(fragments.concat()));
        Script::Events(events)
    }
}

type SentLog = Arc<Mutex<Vec<(usize, String)>>>;

pub(crate) struct ScriptedGateway {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    created: Mutex<Vec<SessionConfig>>,
    sent: SentLog,
    fail_create: bool,
}

impl ScriptedGateway {
    pub(crate) fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(VecDeque::from(scripts))),
            created: Mutex::new(Vec::new()),
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_create: false,
        }
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub(crate) fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    /// Configs of every context created so far, in order.
    pub(crate) fn created_configs(&self) -> Vec<SessionConfig> {
        self.created.lock().unwrap().clone()
    }

    /// `(context index, text)` for every message sent.
    pub(crate) fn sent(&self) -> Vec<(usize, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        if self.fail_create {
            return Err(GatewayError::ConnectionError("unreachable".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(config.clone());
        Ok(Box::new(ScriptedSession {
            index: created.len() - 1,
            model: config.model.clone(),
            scripts: self.scripts.clone(),
            sent: self.sent.clone(),
        }))
    }
}

struct ScriptedSession {
    index: usize,
    model: Model,
    scripts: Arc<Mutex<VecDeque<Script>>>,
    sent: SentLog,
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send_streaming(&self, content: &str) -> Result<StreamHandle, GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((self.index, content.to_string()));
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::reply(&[]));

        let (tx, handle) = StreamHandle::channel();
        match script {
            Script::FailOpen(error) => return Err(error),
            Script::Events(events) => {
                tokio::spawn(async move {
                    for event in events {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Script::Gated(gate, events) => {
                tokio::spawn(async move {
                    gate.notified().await;
                    for event in events {
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                });
            }
            Script::Hang => {
                tokio::spawn(async move {
                    let _tx = tx;
                    std::future::pending::<()>().await;
                });
            }
        }
        Ok(handle)
    }
}
