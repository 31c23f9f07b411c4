//! Session controller.
//!
//! Owns the session state (profile + message log) and drives one chat
//! exchange at a time:
//!
//! ```text
//! Idle -> Sending -> Streaming -> Settled{Complete | Errored} -> Idle
//! ```
//!
//! A send claims the in-flight flag; while it is held every other
//! [`submit`](SessionController::submit) is a no-op. The flag is released on
//! every exit path by [`InFlightGuard`]'s `Drop`.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::GatewayError;
use crate::ports::session_observer::{ExchangeOutcome, NoObserver, SessionObserver};
use crate::ports::state_store::StateStore;
use crate::ports::transcript_sink::TranscriptSink;
use crate::stores::{MessageLogStore, ProfileStore};
use crate::use_cases::chat_client::ChatSessionClient;
use bizbrain_domain::{
    BusinessProfile, DomainError, Message, ProfileField, StreamEvent, export_transcript,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reply shown in place of the assistant message when an exchange fails.
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error. Please check your connection and try again.";

/// Why a submission was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The input was empty or whitespace only.
    Blank,
    /// Another exchange is still in flight.
    Busy,
}

/// Result of [`SessionController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Settled {
        message_id: String,
        outcome: ExchangeOutcome,
    },
}

/// Process-local session state, owned by the controller.
pub struct SessionState {
    pub profile: ProfileStore,
    pub log: MessageLogStore,
}

impl SessionState {
    /// Load both slots from `store`.
    pub fn load(store: Arc<dyn StateStore>) -> Self {
        Self {
            profile: ProfileStore::load(store.clone()),
            log: MessageLogStore::load(store),
        }
    }
}

/// Holds the in-flight flag for the duration of one exchange.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Orchestrates user input, the chat client, and the persisted state.
pub struct SessionController {
    client: ChatSessionClient,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
    observer: Arc<dyn SessionObserver>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SessionController {
    pub fn new(client: ChatSessionClient, state: SessionState) -> Self {
        Self {
            client,
            state: Mutex::new(state),
            in_flight: AtomicBool::new(false),
            observer: Arc::new(NoObserver),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn client(&self) -> &ChatSessionClient {
        &self.client
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn profile(&self) -> BusinessProfile {
        self.state().profile.profile().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state().log.messages().to_vec()
    }

    /// Edit one profile field. Takes effect for the next conversation
    /// context only (see [`clear_history`](Self::clear_history)).
    pub fn update_profile(&self, field: ProfileField, value: &str) -> Result<(), DomainError> {
        self.state().profile.set_field(field, value)
    }

    /// Send `text` and stream the reply into the log. No timeout.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.submit_with_cancel(text, CancellationToken::new()).await
    }

    /// Like [`submit`](Self::submit), but `cancel` aborts a pending exchange.
    /// A cancelled exchange settles as [`ExchangeOutcome::Errored`].
    pub async fn submit_with_cancel(&self, text: &str, cancel: CancellationToken) -> SubmitOutcome {
        if text.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Blank);
        }
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Submission ignored: exchange already in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        let user_message = Message::user(text);
        let placeholder = Message::assistant_placeholder();
        let message_id = placeholder.id.clone();

        let (profile, history) = {
            let mut state = self.state();
            let history = state.log.messages().to_vec();
            state.log.append(user_message.clone());
            state.log.append(placeholder.clone());
            (state.profile.profile().clone(), history)
        };
        self.observer.on_message_appended(&user_message);
        self.observer.on_message_appended(&placeholder);
        self.conversation_logger.log(ConversationEvent::new(
            "user_message",
            serde_json::json!({ "id": user_message.id, "text": text }),
        ));

        let outcome = match self
            .run_exchange(text, &profile, &history, &message_id, &cancel)
            .await
        {
            Ok(reply) => {
                info!(bytes = reply.len(), "Exchange complete");
                self.conversation_logger.log(ConversationEvent::new(
                    "assistant_response",
                    serde_json::json!({ "id": message_id, "bytes": reply.len(), "text": reply }),
                ));
                ExchangeOutcome::Complete
            }
            Err(e) => {
                warn!(error = %e, "Exchange failed");
                self.state().log.replace_content(&message_id, ERROR_REPLY);
                self.conversation_logger.log(ConversationEvent::new(
                    "exchange_failed",
                    serde_json::json!({ "id": message_id, "error": e.to_string() }),
                ));
                ExchangeOutcome::Errored
            }
        };

        let settled = self.state().log.get(&message_id).cloned();
        if let Some(message) = settled {
            self.observer.on_settled(&message, outcome);
        }

        SubmitOutcome::Settled {
            message_id,
            outcome,
        }
    }

    async fn run_exchange(
        &self,
        text: &str,
        profile: &BusinessProfile,
        history: &[Message],
        message_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        let mut handle = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            opened = self.client.stream_chat(text, profile, history) => opened?,
        };
        self.observer.on_stream_started(message_id);

        let mut reply = String::new();
        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
                event = handle.next_event() => event,
            };

            match event {
                Some(StreamEvent::Delta(fragment)) => {
                    if fragment.is_empty() {
                        continue;
                    }
                    reply.push_str(&fragment);
                    self.state().log.extend_content(message_id, &fragment);
                    self.observer.on_fragment(message_id, &fragment);
                }
                Some(StreamEvent::Completed(full)) => {
                    // Producers that never sent deltas deliver everything here
                    if reply.is_empty() && !full.is_empty() {
                        self.state().log.extend_content(message_id, &full);
                        self.observer.on_fragment(message_id, &full);
                        reply = full;
                    }
                    return Ok(reply);
                }
                Some(StreamEvent::Error(e)) => return Err(GatewayError::RequestFailed(e)),
                None => return Ok(reply),
            }
        }
    }

    /// Empty the log and drop the conversation context, so the next send
    /// starts fresh with the current profile.
    pub async fn clear_history(&self) {
        let cleared = {
            let mut state = self.state();
            let count = state.log.len();
            state.log.clear();
            count
        };
        self.client.reset_chat().await;
        info!(messages = cleared, "Chat history cleared");
        self.conversation_logger.log(ConversationEvent::new(
            "history_cleared",
            serde_json::json!({ "messages": cleared }),
        ));
    }

    /// The whole log as a plain-text transcript with local timestamps.
    pub fn export(&self) -> String {
        let messages = self.messages();
        debug!(messages = messages.len(), "Exporting transcript");
        export_transcript(&messages, &chrono::Local)
    }

    /// Export the transcript through `sink`, into `dir` when given.
    pub fn export_to_dir(&self, sink: &dyn TranscriptSink, dir: Option<&Path>) -> io::Result<PathBuf> {
        let path = sink.save(&self.export(), dir)?;
        info!(path = %path.display(), "Transcript exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatSettings;
    use crate::ports::state_store::InMemoryStateStore;
    use crate::stores::CHAT_HISTORY_KEY;
    use crate::use_cases::test_support::{Script, ScriptedGateway};
    use bizbrain_domain::{Role, parse_transcript};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn controller(gateway: Arc<ScriptedGateway>) -> (Arc<SessionController>, Arc<dyn StateStore>) {
        let store: Arc<dyn StateStore> = Arc::new(InMemoryStateStore::new());
        let client = ChatSessionClient::new(gateway, ChatSettings::default());
        let controller = SessionController::new(client, SessionState::load(store.clone()));
        (Arc::new(controller), store)
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl SessionObserver for RecordingObserver {
        fn on_message_appended(&self, message: &Message) {
            self.events.lock().unwrap().push(format!("append:{}", message.role));
        }
        fn on_stream_started(&self, _message_id: &str) {
            self.events.lock().unwrap().push("start".to_string());
        }
        fn on_fragment(&self, _message_id: &str, fragment: &str) {
            self.events.lock().unwrap().push(format!("fragment:{fragment}"));
        }
        fn on_settled(&self, message: &Message, outcome: ExchangeOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("settled:{outcome:?}:{}", message.content));
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let (controller, _) = controller(gateway.clone());

        for input in ["", "   ", "\n\t "] {
            assert_eq!(
                controller.submit(input).await,
                SubmitOutcome::Ignored(IgnoreReason::Blank)
            );
        }
        assert!(controller.messages().is_empty());
        assert!(gateway.sent().is_empty());
        assert!(gateway.created_configs().is_empty());
    }

    #[tokio::test]
    async fn test_fragments_accumulate_in_placeholder() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::reply(&[
            "## Plan\n",
            "- **Focus**",
            " on retention",
        ])]));
        let (controller, store) = controller(gateway);
        let observer = Arc::new(RecordingObserver::default());
        let controller = Arc::try_unwrap(controller)
            .ok()
            .unwrap()
            .with_observer(observer.clone());

        let outcome = controller.submit("How do I grow?").await;
        let SubmitOutcome::Settled { message_id, outcome } = outcome else {
            panic!("expected settled outcome");
        };
        assert_eq!(outcome, ExchangeOutcome::Complete);

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "How do I grow?");
        assert_eq!(messages[1].id, message_id);
        assert_eq!(messages[1].content, "## Plan\n- **Focus** on retention");
        assert!(!controller.is_sending());

        let persisted = store.get(CHAT_HISTORY_KEY).unwrap().unwrap();
        assert!(persisted.contains("on retention"));

        let events = observer.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "append:user",
                "append:assistant",
                "start",
                "fragment:## Plan\n",
                "fragment:- **Focus**",
                "fragment: on retention",
                "settled:Complete:## Plan\n- **Focus** on retention",
            ]
        );
    }

    #[tokio::test]
    async fn test_mid_stream_failure_replaces_placeholder_and_releases_flag() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            Script::Events(vec![
                StreamEvent::Delta("Partial ans".to_string()),
                StreamEvent::Error("connection reset".to_string()),
            ]),
            Script::reply(&["recovered"]),
        ]));
        let (controller, _) = controller(gateway);

        let first = controller.submit("Question one").await;
        assert!(matches!(
            first,
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Errored,
                ..
            }
        ));
        assert_eq!(controller.messages()[1].content, ERROR_REPLY);
        assert!(!controller.is_sending());

        let second = controller.submit("Question two").await;
        assert!(matches!(
            second,
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Complete,
                ..
            }
        ));
        assert_eq!(controller.messages()[3].content, "recovered");
    }

    #[tokio::test]
    async fn test_open_failure_settles_errored() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::FailOpen(
            GatewayError::ApiError {
                status: 403,
                message: "API key not valid".to_string(),
            },
        )]));
        let (controller, _) = controller(gateway);
        controller.submit("Hi").await;
        assert_eq!(controller.messages()[1].content, ERROR_REPLY);
        assert!(!controller.is_sending());
    }

    #[tokio::test]
    async fn test_context_creation_failure_settles_errored() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]).failing_create());
        let (controller, _) = controller(gateway.clone());
        let outcome = controller.submit("Hi").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Errored,
                ..
            }
        ));
        assert_eq!(controller.messages()[1].content, ERROR_REPLY);
        assert!(gateway.sent().is_empty());
        assert!(!controller.client().has_active_session().await);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_noop() {
        let gate = Arc::new(Notify::new());
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::Gated(
            gate.clone(),
            vec![StreamEvent::Completed("done".to_string())],
        )]));
        let (controller, _) = controller(gateway.clone());

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("first").await }
        });
        while !controller.is_sending() {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            controller.submit("second").await,
            SubmitOutcome::Ignored(IgnoreReason::Busy)
        );
        assert_eq!(controller.messages().len(), 2);

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Complete,
                ..
            }
        ));
        assert!(!controller.is_sending());
        assert_eq!(gateway.sent(), vec![(0, "first".to_string())]);
        assert_eq!(controller.messages()[1].content, "done");
    }

    #[tokio::test]
    async fn test_clear_history_resets_context_with_current_profile() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let (controller, store) = controller(gateway.clone());

        controller
            .update_profile(ProfileField::Industry, "Finance")
            .unwrap();
        controller.submit("first").await;

        controller
            .update_profile(ProfileField::Industry, "Education")
            .unwrap();
        controller.submit("second").await;
        assert_eq!(gateway.created_configs().len(), 1);

        controller.clear_history().await;
        assert!(controller.messages().is_empty());
        assert_eq!(store.get(CHAT_HISTORY_KEY).unwrap().as_deref(), Some("[]"));
        assert!(!controller.client().has_active_session().await);

        controller.submit("third").await;
        let configs = gateway.created_configs();
        assert_eq!(configs.len(), 2);
        assert!(configs[0].system_instruction.contains("Industry: Finance"));
        assert!(configs[1].system_instruction.contains("Industry: Education"));
        assert_eq!(gateway.sent().last(), Some(&(1, "third".to_string())));
    }

    #[tokio::test]
    async fn test_cancel_settles_errored_and_releases_flag() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::Hang]));
        let (controller, _) = controller(gateway.clone());
        let cancel = CancellationToken::new();

        let pending = tokio::spawn({
            let controller = controller.clone();
            let cancel = cancel.clone();
            async move { controller.submit_with_cancel("stuck?", cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let outcome = pending.await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Settled {
                outcome: ExchangeOutcome::Errored,
                ..
            }
        ));
        assert_eq!(controller.messages()[1].content, ERROR_REPLY);
        assert!(!controller.is_sending());

        gateway.push(Script::reply(&["ok"]));
        controller.submit("again").await;
        assert_eq!(controller.messages()[3].content, "ok");
    }

    #[tokio::test]
    async fn test_completed_without_deltas_fills_placeholder() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::Events(vec![
            StreamEvent::Completed("whole reply".to_string()),
        ])]));
        let (controller, _) = controller(gateway);
        controller.submit("Hi").await;
        assert_eq!(controller.messages()[1].content, "whole reply");
    }

    #[tokio::test]
    async fn test_export_round_trips_through_parser() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::reply(&[
            "### SWOT\n",
            "**S**: brand",
        ])]));
        let (controller, _) = controller(gateway);
        controller.submit("Run a SWOT").await;

        let entries = parse_transcript(&controller.export()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].content, "Run a SWOT");
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].content, "### SWOT\n**S**: brand");
    }

    struct RecordingSink(Mutex<Vec<(String, Option<PathBuf>)>>);

    impl TranscriptSink for RecordingSink {
        fn save(&self, transcript: &str, dir: Option<&Path>) -> io::Result<PathBuf> {
            self.0
                .lock()
                .unwrap()
                .push((transcript.to_string(), dir.map(Path::to_path_buf)));
            Ok(dir.unwrap_or(Path::new(".")).join("out.txt"))
        }
    }

    #[tokio::test]
    async fn test_export_to_dir_hands_transcript_to_sink() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::reply(&["fine"])]));
        let (controller, _) = controller(gateway);
        controller.submit("How are margins?").await;

        let sink = RecordingSink(Mutex::new(Vec::new()));
        let path = controller
            .export_to_dir(&sink, Some(Path::new("/tmp/reports")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/reports/out.txt"));

        let saved = sink.0.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.contains("How are margins?"));
        assert!(saved[0].0.contains("\n---\n\n"));
        assert_eq!(saved[0].1.as_deref(), Some(Path::new("/tmp/reports")));
    }

    #[tokio::test]
    async fn test_state_reloads_from_store() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Script::reply(&["hello"])]));
        let (controller, store) = controller(gateway.clone());
        controller
            .update_profile(ProfileField::TargetMarket, "Gen Z in USA")
            .unwrap();
        controller.submit("hi").await;

        let client = ChatSessionClient::new(gateway, ChatSettings::default());
        let reloaded = SessionController::new(client, SessionState::load(store));
        assert_eq!(reloaded.profile().target_market, "Gen Z in USA");
        assert_eq!(reloaded.messages().len(), 2);
        assert_eq!(reloaded.messages()[1].content, "hello");
    }
}
