//! Contact handlers.

use anyhow::{Context, Result};
use chatty::state::{ContactsEvent, ContactsState, ListStatus};
use chatty::{ChatClient, Contact, UserId};
use colored::Colorize;
use serde::Serialize;

use crate::output::{PlainPrint, TableRow};

/// Contact list entry.
#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
    pub photo_url: String,
    pub preview: String,
}

impl ContactInfo {
    fn new(contact: &Contact, preview: String) -> Self {
        Self {
            uid: contact.uid.to_string(),
            name: contact.display_name_or_default().to_string(),
            email: contact.email.clone(),
            photo_url: contact.photo_or_placeholder().to_string(),
            preview,
        }
    }
}

impl TableRow for ContactInfo {
    fn headers() -> Vec<&'static str> {
        vec!["UID", "Name", "Email", "Last Message"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.uid.clone(),
            self.name.clone(),
            self.email.clone().unwrap_or_default(),
            self.preview.clone(),
        ]
    }
}

impl PlainPrint for ContactInfo {
    fn plain_print(&self) {
        println!("{} {}", self.name.bold(), format!("[{}]", self.uid).cyan());
        println!("   {}", self.preview.dimmed());
    }
}

/// Contact list result.
#[derive(Debug, Clone, Serialize)]
pub struct ContactListResult {
    pub search: String,
    pub contacts: Vec<ContactInfo>,
    /// Set when nothing is listed.
    pub notice: Option<String>,
}

/// List the viewer's contacts with their last-message previews.
pub async fn list_contacts(client: &ChatClient, search: Option<&str>) -> Result<ContactListResult> {
    let viewer = client
        .current_uid()
        .context("Authentication required")?
        .clone();
    let mut state = ContactsState::new(viewer);

    let mut feed = client.contacts().subscribe_all().await?;
    if let Some(contacts) = feed.next().await {
        state.apply(ContactsEvent::Contacts(contacts));
    }
    feed.close();

    if let Some(query) = search {
        state.apply(ContactsEvent::Search(query.to_string()));
    }

    let uids: Vec<UserId> = state.visible().iter().map(|c| c.uid.clone()).collect();
    for uid in uids {
        let mut preview = client.chats().last_message(uid.clone()).await?;
        let text = preview.next().await.flatten();
        state.apply(ContactsEvent::Preview(uid, text));
    }

    let notice = match state.status() {
        ListStatus::Ready => None,
        ListStatus::Loading => Some("No contacts yet".to_string()),
        ListStatus::NoMatches => Some("No contacts found".to_string()),
    };

    Ok(ContactListResult {
        search: state.query.clone(),
        contacts: state
            .visible()
            .into_iter()
            .map(|c| ContactInfo::new(c, state.preview_for(&c.uid)))
            .collect(),
        notice,
    })
}

/// Show one contact.
pub async fn show_contact(client: &ChatClient, uid: &str) -> Result<ContactInfo> {
    let contact = client
        .users()
        .get(uid)
        .await?
        .with_context(|| format!("No user {}", uid))?;

    let preview = match client.current_uid() {
        Some(viewer) if viewer.as_str() != uid => {
            let mut feed = client.chats().last_message(uid).await?;
            chatty::api::preview_text(feed.next().await.flatten().as_deref())
        }
        _ => chatty::api::preview_text(None),
    };

    Ok(ContactInfo::new(&contact, preview))
}
