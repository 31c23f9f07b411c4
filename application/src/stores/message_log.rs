//! Message log store

use super::{load_slot, save_slot};
use crate::ports::state_store::StateStore;
use bizbrain_domain::Message;
use std::sync::Arc;

/// Storage key of the serialized message log.
pub const CHAT_HISTORY_KEY: &str = "biz_chat_history";

/// Ordered chat log, mirrored to storage after every change.
pub struct MessageLogStore {
    messages: Vec<Message>,
    store: Arc<dyn StateStore>,
}

impl MessageLogStore {
    /// Load the persisted log (or an empty one).
    pub fn load(store: Arc<dyn StateStore>) -> Self {
        let messages: Vec<Message> = load_slot(store.as_ref(), CHAT_HISTORY_KEY);
        Self { messages, store }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.persist();
    }

    /// Append `fragment` to the content of message `id`.
    ///
    /// Returns `false` when the message no longer exists (e.g. the log was
    /// cleared while its reply was streaming).
    pub fn extend_content(&mut self, id: &str, fragment: &str) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        message.content.push_str(fragment);
        self.persist();
        true
    }

    /// Replace the content of message `id` wholesale.
    pub fn replace_content(&mut self, id: &str, content: &str) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        message.content = content.to_string();
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.persist();
    }

    fn persist(&self) {
        save_slot(self.store.as_ref(), CHAT_HISTORY_KEY, &self.messages);
    }
}
