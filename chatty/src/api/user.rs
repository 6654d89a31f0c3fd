//! User API.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    client::ChatClientInner,
    error::{Error, Result},
    models::{Contact, UserId},
    store::{Query, RemoteStoreExt, StorePath},
};

/// Record field holding a user's display name.
pub const DISPLAY_NAME_FIELD: &str = "displayName";

/// API for the signed-in user's own record.
pub struct UserApi {
    client: Arc<ChatClientInner>,
}

impl UserApi {
    pub(crate) fn new(client: Arc<ChatClientInner>) -> Self {
        Self { client }
    }

    /// Publish the signed-in user's contact record.
    ///
    /// Called after sign-in; overwrites any previous record for the user.
    pub async fn register(&self) -> Result<Contact> {
        let session = self.client.require_session()?;
        let contact = session.to_contact();

        self.client
            .store
            .set_record(&StorePath::user(&session.uid), &contact)
            .await?;

        log::debug!("Registered user {}", session.uid);
        Ok(contact)
    }

    /// Read a user's record once.
    pub async fn get(&self, uid: impl Into<UserId>) -> Result<Option<Contact>> {
        let snapshot = self
            .client
            .store
            .get_once(Query::new(StorePath::user(&uid.into())))
            .await?;
        Ok(snapshot.parse())
    }

    /// Change the signed-in user's display name.
    ///
    /// The stored record is updated first; the identity provider is then
    /// updated on a best-effort basis.
    pub async fn rename(&self, name: &str) -> Result<ProfileUpdate> {
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("Display name cannot be blank".into()));
        }

        let uid = self.client.viewer()?;
        self.client
            .store
            .set(
                &StorePath::user_field(uid, DISPLAY_NAME_FIELD),
                Value::from(name),
            )
            .await?;

        let mirrored = match &self.client.auth {
            Some(auth) => match auth.update_display_name(name).await {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Failed to update identity display name for {}: {}", uid, e);
                    false
                }
            },
            None => false,
        };

        Ok(ProfileUpdate {
            display_name: name.to_owned(),
            mirrored,
        })
    }
}

/// Outcome of a display name change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    /// Whether the identity provider took the new name too.
    pub mirrored: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AuthInfo, AuthProvider, ChatClient, MemoryAuth};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_register_and_get() {
        let client = ChatClient::builder()
            .store(Arc::new(MemoryStore::new()))
            .session(AuthInfo::new("u1").with_name("Ada"))
            .build()
            .unwrap();

        client.users().register().await.unwrap();
        let contact = client.users().get("u1").await.unwrap().unwrap();

        assert_eq!(contact.display_name.as_deref(), Some("Ada"));
        assert!(client.users().get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_mirrors_to_provider() {
        let auth = Arc::new(MemoryAuth::signed_in(AuthInfo::new("u1")));
        let client = ChatClient::builder()
            .store(Arc::new(MemoryStore::new()))
            .auth(auth.clone())
            .build()
            .unwrap();

        let update = client.users().rename("Grace").await.unwrap();

        assert!(update.mirrored);
        assert_eq!(
            auth.current_user().unwrap().display_name.as_deref(),
            Some("Grace")
        );
        let stored = client.users().get("u1").await.unwrap().unwrap();
        assert_eq!(stored.display_name.as_deref(), Some("Grace"));
    }

    #[tokio::test]
    async fn test_rename_mirror_failure_is_not_an_error() {
        let auth = Arc::new(MemoryAuth::signed_in(AuthInfo::new("u1")));
        auth.fail_updates(true);
        let client = ChatClient::builder()
            .store(Arc::new(MemoryStore::new()))
            .auth(auth)
            .build()
            .unwrap();

        let update = client.users().rename("Grace").await.unwrap();
        assert!(!update.mirrored);
    }

    #[tokio::test]
    async fn test_rename_rejects_blank() {
        let client = ChatClient::builder()
            .store(Arc::new(MemoryStore::new()))
            .uid("u1")
            .build()
            .unwrap();

        assert!(matches!(
            client.users().rename("  ").await,
            Err(Error::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_store_failure_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.deny(StorePath::users());
        let client = ChatClient::builder().store(store).uid("u1").build().unwrap();

        assert!(matches!(
            client.users().rename("Grace").await,
            Err(Error::PermissionDenied(_))
        ));
    }
}
