//! Contact API.

use std::sync::Arc;

use crate::{
    api::Feed,
    client::ChatClientInner,
    error::Result,
    models::{Contact, UserId},
    store::{Query, Snapshot, StorePath},
};

/// Longest preview shown before truncation.
pub const PREVIEW_LIMIT: usize = 30;

/// Preview shown for conversations without messages.
pub const NO_MESSAGES: &str = "No messages yet";

/// API for the contact list and contact profiles.
pub struct ContactApi {
    client: Arc<ChatClientInner>,
}

impl ContactApi {
    pub(crate) fn new(client: Arc<ChatClientInner>) -> Self {
        Self { client }
    }

    /// Follow the full user collection.
    pub async fn subscribe_all(&self) -> Result<Feed<Vec<Contact>>> {
        let subscription = self
            .client
            .store
            .subscribe(Query::new(StorePath::users()))
            .await?;
        Ok(Feed::new(subscription, contact_list))
    }

    /// Follow one user's profile.
    pub async fn profile(&self, uid: impl Into<UserId>) -> Result<Feed<Option<Contact>>> {
        let subscription = self
            .client
            .store
            .subscribe(Query::new(StorePath::user(&uid.into())))
            .await?;
        Ok(Feed::new(subscription, contact_profile))
    }
}

fn contact_list(snapshot: Result<Snapshot>) -> Vec<Contact> {
    match snapshot {
        Ok(snapshot) => snapshot.parse_children(),
        Err(e) => {
            log::warn!("Failed to load contacts: {}", e);
            Vec::new()
        }
    }
}

fn contact_profile(snapshot: Result<Snapshot>) -> Option<Contact> {
    match snapshot {
        Ok(snapshot) => snapshot.parse(),
        Err(e) => {
            log::warn!("Error fetching user data: {}", e);
            None
        }
    }
}

/// Contacts matching `query`, without the viewer.
pub fn filter_contacts<'a>(
    contacts: &'a [Contact],
    query: &str,
    viewer: &UserId,
) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|c| &c.uid != viewer && c.matches(query))
        .collect()
}

/// Last-message preview as shown in the contact list.
pub fn preview_text(text: Option<&str>) -> String {
    match text {
        Some(text) if text.chars().count() > PREVIEW_LIMIT => {
            let head: String = text.chars().take(PREVIEW_LIMIT).collect();
            format!("{}...", head)
        }
        Some(text) => text.to_owned(),
        None => NO_MESSAGES.to_owned(),
    }
}
