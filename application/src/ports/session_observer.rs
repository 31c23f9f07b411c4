//! Session observer port
//!
//! The view layer implements [`SessionObserver`] to follow a chat exchange
//! as it happens: new messages, each streamed fragment, and the final
//! settled message.

use bizbrain_domain::Message;

/// How an exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The fragment stream ran to completion.
    Complete,
    /// The remote exchange failed (or was cancelled); the placeholder holds
    /// the fixed error reply.
    Errored,
}

/// Callbacks fired by the session controller. All methods default to no-ops.
pub trait SessionObserver: Send + Sync {
    /// A user message or assistant placeholder was appended to the log.
    fn on_message_appended(&self, _message: &Message) {}

    /// The remote stream for `message_id` was opened.
    fn on_stream_started(&self, _message_id: &str) {}

    /// `fragment` was appended to the placeholder `message_id`.
    fn on_fragment(&self, _message_id: &str, _fragment: &str) {}

    /// The exchange reached a terminal state; `message` is the final
    /// assistant message.
    fn on_settled(&self, _message: &Message, _outcome: ExchangeOutcome) {}
}

/// Observer that ignores every event.
pub struct NoObserver;

impl SessionObserver for NoObserver {}
