use crate::models::user::{Role, User};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserStoreError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already registered")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error("credential hashing failed")]
    Hash(#[from] bcrypt::BcryptError),
}

/// In-memory store of user accounts
///
/// Usernames and emails are unique case-insensitively; the secondary
/// indexes are claimed through the entry API so concurrent registrations
/// of the same identity resolve to one winner.
pub struct UserStore {
    users: DashMap<Uuid, User>,
    by_username: DashMap<String, Uuid>,
    by_email: DashMap<String, Uuid>,
}

fn fold(value: &str) -> String {
    value.to_lowercase()
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            by_username: DashMap::new(),
            by_email: DashMap::new(),
        }
    }

    /// Register a new account, hashing the password with bcrypt
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, UserStoreError> {
        let username_key = fold(username);
        let email_key = fold(email);

        let id = Uuid::new_v4();

        match self.by_username.entry(username_key.clone()) {
            Entry::Occupied(_) => return Err(UserStoreError::DuplicateUsername),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        match self.by_email.entry(email_key) {
            Entry::Occupied(_) => {
                // Roll back the username claim
                self.by_username.remove(&username_key);
                return Err(UserStoreError::DuplicateEmail);
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let password_hash = match hash(password, DEFAULT_COST) {
            Ok(hashed) => hashed,
            Err(e) => {
                // Release both index claims before surfacing the failure
                self.by_username.remove(&username_key);
                self.by_email.remove(&fold(email));
                return Err(UserStoreError::Hash(e));
            }
        };

        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        self.users.insert(id, user.clone());

        info!(username = %user.username, role = user.role.as_str(), "User registered");

        Ok(user)
    }

    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|entry| entry.value().clone())
    }

    pub fn get_by_email(&self, email: &str) -> Option<User> {
        let id = *self.by_email.get(&fold(email))?;
        self.get(id)
    }

    /// Verify a presented password against the stored bcrypt hash
    ///
    /// Returns the matching user so login can issue a token. A missing
    /// account and a wrong password are indistinguishable to the caller.
    pub fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserStoreError> {
        let user = match self.get_by_email(email) {
            Some(user) => user,
            None => return Ok(None),
        };

        let valid = verify(password, &user.password_hash)?;

        Ok(if valid { Some(user) } else { None })
    }

    /// Out-of-band role change; takes effect on the user's next request
    pub fn set_role(&self, id: Uuid, role: Role) -> Result<User, UserStoreError> {
        let mut entry = self.users.get_mut(&id).ok_or(UserStoreError::NotFound)?;
        entry.role = role;
        Ok(entry.value().clone())
    }

    /// Seed an admin account when none exists yet
    ///
    /// Idempotent: a second call with the same credentials is a no-op, and
    /// any pre-existing admin suppresses the seed.
    pub fn ensure_admin(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let has_admin = self.users.iter().any(|entry| entry.role == Role::Admin);
        if has_admin {
            return Ok(());
        }

        self.register(username, email, password, Role::Admin)
            .context("Failed to seed admin account")?;

        info!(username = %username, "Seeded initial admin account");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
