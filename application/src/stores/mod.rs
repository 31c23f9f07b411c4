//! In-memory session state mirrored to a [`StateStore`](crate::ports::state_store::StateStore).
//!
//! Both stores load once at startup and rewrite their slot after every
//! change. A slot that fails to deserialize is logged and replaced by the
//! default value instead of blocking startup.

pub mod message_log;
pub mod profile_store;

pub use message_log::{CHAT_HISTORY_KEY, MessageLogStore};
pub use profile_store::{PROFILE_KEY, ProfileStore};

use crate::ports::state_store::{StateStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Read and decode a slot, falling back to `T::default()` when the slot is
/// empty, unreadable, or malformed.
fn load_slot<T: DeserializeOwned + Default>(store: &dyn StateStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "Could not read persisted state, starting empty");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Persisted state is malformed, starting empty");
            T::default()
        }
    }
}

/// Encode and write a slot. Failures are logged; the in-memory value stays
/// authoritative.
fn save_slot<T: Serialize + ?Sized>(store: &dyn StateStore, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|json| store.set(key, &json));
    if let Err(e) = result {
        warn!(key, error = %e, "Could not persist state");
    }
}
