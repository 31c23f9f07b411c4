//! Profile store

use super::{load_slot, save_slot};
use crate::ports::state_store::StateStore;
use bizbrain_domain::{BusinessProfile, DomainError, ProfileField};
use std::sync::Arc;
use tracing::debug;

/// Storage key of the serialized profile.
pub const PROFILE_KEY: &str = "biz_profile";

/// Holds the business profile and mirrors every edit to storage.
pub struct ProfileStore {
    profile: BusinessProfile,
    store: Arc<dyn StateStore>,
}

impl ProfileStore {
    /// Load the persisted profile (or an empty one).
    pub fn load(store: Arc<dyn StateStore>) -> Self {
        let profile = load_slot(store.as_ref(), PROFILE_KEY);
        Self { profile, store }
    }

    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }

    /// Set one field and persist. Invalid select values leave the profile
    /// unchanged.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> Result<(), DomainError> {
        self.profile.set(field, value)?;
        debug!(field = %field, value = self.profile.get(field), "Profile field updated");
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        save_slot(self.store.as_ref(), PROFILE_KEY, &self.profile);
    }
}
