//! Signed-in identity.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::models::{Contact, UserId};

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthInfo {
    /// User ID.
    pub uid: UserId,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
}

impl AuthInfo {
    /// Create new auth info.
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the avatar URL.
    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Check if auth looks valid.
    pub fn is_valid(&self) -> bool {
        !self.uid.is_empty()
    }

    /// The contact record published for this user.
    pub fn to_contact(&self) -> Contact {
        Contact {
            uid: self.uid.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// Identity provider holding the signed-in user's profile.
#[async_trait]
pub trait AuthProvider: Send + Sync + std::fmt::Debug {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<AuthInfo>;

    /// Change the signed-in user's display name.
    async fn update_display_name(&self, name: &str) -> Result<()>;
}

/// Identity provider backed by memory.
#[derive(Debug, Default)]
pub struct MemoryAuth {
    user: Mutex<Option<AuthInfo>>,
    fail_updates: Mutex<bool>,
}

impl MemoryAuth {
    /// Create a provider with `user` signed in.
    pub fn signed_in(user: AuthInfo) -> Self {
        Self {
            user: Mutex::new(Some(user)),
            fail_updates: Mutex::new(false),
        }
    }

    /// Sign the user out.
    pub fn sign_out(&self) {
        *lock(&self.user) = None;
    }

    /// Make profile updates fail.
    pub fn fail_updates(&self, fail: bool) {
        *lock(&self.fail_updates) = fail;
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<AuthInfo> {
        lock(&self.user).clone()
    }

    async fn update_display_name(&self, name: &str) -> Result<()> {
        if *lock(&self.fail_updates) {
            return Err(Error::store("identity provider rejected the update"));
        }
        match lock(&self.user).as_mut() {
            Some(user) => {
                user.display_name = Some(name.to_owned());
                Ok(())
            }
            None => Err(Error::AuthRequired),
        }
    }
}
