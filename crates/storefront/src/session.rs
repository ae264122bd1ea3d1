//! Signed-in user, persisted under the `user` key.

use serde::{Deserialize, Serialize};

use crate::storage::{PersistedSlot, SharedStorage, WriteOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Holds whoever is signed in. No credentials are checked here.
#[derive(Debug)]
pub struct UserSlot {
    slot: PersistedSlot<UserProfile>,
}

impl UserSlot {
    pub fn open(storage: SharedStorage, key: impl Into<String>) -> Self {
        Self {
            slot: PersistedSlot::open(storage, key),
        }
    }

    pub fn current(&self) -> Option<&UserProfile> {
        self.slot.get()
    }

    pub fn is_signed_in(&self) -> bool {
        self.slot.is_set()
    }

    pub fn is_admin(&self) -> bool {
        self.current()
            .is_some_and(|user| user.role == UserRole::Admin)
    }

    pub fn sign_in(&mut self, user: UserProfile) -> WriteOutcome {
        tracing::info!("user {} signed in", user.id);
        self.slot.set(user)
    }

    pub fn sign_out(&mut self) -> Option<UserProfile> {
        let user = self.slot.clear();
        if let Some(user) = &user {
            tracing::info!("user {} signed out", user.id);
        }
        user
    }
}
