//! User storage.
//!
//! The identity service depends on the [`UserStore`] trait only. The shipped
//! implementation keeps users in process memory; it is constructed once at
//! startup and shared behind an `Arc`.

use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use thiserror::Error;
use uuid::Uuid;

/// A stored user, including the credential hash.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Normalized (trimmed, lowercase).
    pub email: String,
    pub number: u64,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
}

/// Persistence boundary for users.
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails if the email is taken.
    fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Look up by normalized email.
    fn find_by_email(&self, email: &str) -> Option<User>;

    fn find_by_id(&self, id: Uuid) -> Option<User>;
}

/// Concurrent in-process user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<Uuid, User>,
    /// email → id
    emails: DashMap<String, Uuid>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn insert(&self, user: User) -> Result<User, StoreError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail),
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.emails.get(email)?;
        self.find_by_id(id)
    }

    fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|user| user.clone())
    }
}
