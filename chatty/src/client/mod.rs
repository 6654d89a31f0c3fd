//! Chat client and configuration.

mod auth;

pub use auth::{AuthInfo, AuthProvider, MemoryAuth};

use crate::api::{ChatApi, ContactApi, UserApi};
use crate::error::{Error, Result};
use crate::models::UserId;
use crate::store::RemoteStore;
use std::sync::Arc;

/// Builder for creating ChatClient.
#[derive(Default)]
pub struct ChatClientBuilder {
    store: Option<Arc<dyn RemoteStore>>,
    auth: Option<Arc<dyn AuthProvider>>,
    session: Option<AuthInfo>,
}

impl std::fmt::Debug for ChatClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClientBuilder")
            .field("store", &self.store)
            .field("auth", &self.auth.as_ref().map(|_| "..."))
            .field("session", &self.session.as_ref().map(|s| &s.uid))
            .finish()
    }
}

impl ChatClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the remote store.
    pub fn store(mut self, store: Arc<dyn RemoteStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the identity provider.
    ///
    /// When no session is given explicitly, the provider's current user is
    /// used.
    pub fn auth(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    /// Set the signed-in session.
    pub fn session(mut self, session: AuthInfo) -> Self {
        self.session = Some(session);
        self
    }

    /// Sign in with a bare user ID.
    pub fn uid(mut self, uid: impl Into<UserId>) -> Self {
        self.session = Some(AuthInfo::new(uid));
        self
    }

    /// Build ChatClient.
    pub fn build(self) -> Result<ChatClient> {
        let store = self
            .store
            .ok_or_else(|| Error::InvalidArgument("A remote store is required".into()))?;

        let session = self
            .session
            .or_else(|| self.auth.as_ref().and_then(|a| a.current_user()))
            .filter(AuthInfo::is_valid);

        Ok(ChatClient {
            inner: Arc::new(ChatClientInner {
                store,
                auth: self.auth,
                session,
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct ChatClientInner {
    pub store: Arc<dyn RemoteStore>,
    pub auth: Option<Arc<dyn AuthProvider>>,
    pub session: Option<AuthInfo>,
}

impl ChatClientInner {
    /// Get session or error.
    pub fn require_session(&self) -> Result<&AuthInfo> {
        self.session.as_ref().ok_or(Error::AuthRequired)
    }

    /// The viewer's user ID or error.
    pub fn viewer(&self) -> Result<&UserId> {
        self.require_session().map(|s| &s.uid)
    }
}

/// Chat client over a remote store.
#[derive(Clone)]
pub struct ChatClient {
    pub(crate) inner: Arc<ChatClientInner>,
}

impl ChatClient {
    /// Create a new client builder.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }

    /// Get the chat API.
    pub fn chats(&self) -> ChatApi {
        ChatApi::new(self.inner.clone())
    }

    /// Get the contact API.
    pub fn contacts(&self) -> ContactApi {
        ContactApi::new(self.inner.clone())
    }

    /// Get the user API.
    pub fn users(&self) -> UserApi {
        UserApi::new(self.inner.clone())
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.inner.store
    }

    /// Check if the client is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_some()
    }

    /// Get the current session.
    pub fn session(&self) -> Option<&AuthInfo> {
        self.inner.session.as_ref()
    }

    /// Get the current user ID if signed in.
    pub fn current_uid(&self) -> Option<&UserId> {
        self.inner.session.as_ref().map(|s| &s.uid)
    }
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.inner.store)
            .finish()
    }
}
