//! Screen state.
//!
//! Each screen keeps its data in one state object. Store notifications and
//! user input are turned into events and fed through `apply`; rendering reads
//! the state and never mutates it.

use std::collections::HashMap;

use crate::api::{filter_contacts, preview_text};
use crate::models::{Contact, Message, UserId};
use crate::timeline::{build_timeline, Timeline};

/// Header name for a contact whose profile has no display name.
pub const NO_NAME: &str = "No name";

/// Input to [`ChatState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The message collection was replaced.
    Messages(Vec<Message>),
    /// The other participant's profile changed.
    Contact(Option<Contact>),
    /// The draft text was edited.
    DraftChanged(String),
    /// An emoji was picked from the keyboard.
    EmojiPicked(String),
}

/// State of an open conversation screen.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    pub viewer: UserId,
    pub contact: Option<Contact>,
    pub messages: Vec<Message>,
    pub timeline: Timeline,
    pub draft: String,
}

impl ChatState {
    pub fn new(viewer: impl Into<UserId>) -> Self {
        Self {
            viewer: viewer.into(),
            ..Default::default()
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Messages(messages) => {
                self.timeline = build_timeline(&messages, &self.viewer);
                self.messages = messages;
            }
            ChatEvent::Contact(contact) => self.contact = contact,
            ChatEvent::DraftChanged(text) => self.draft = text,
            ChatEvent::EmojiPicked(emoji) => self.draft.push_str(&emoji),
        }
    }

    /// Take the draft for sending. Blank drafts stay put and yield `None`.
    pub fn take_draft(&mut self) -> Option<String> {
        if self.draft.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.draft))
    }

    /// Name shown in the conversation header.
    pub fn header_name(&self) -> &str {
        self.contact
            .as_ref()
            .and_then(|c| c.display_name.as_deref())
            .unwrap_or(NO_NAME)
    }
}

/// Input to [`ContactsState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactsEvent {
    /// The user collection was replaced.
    Contacts(Vec<Contact>),
    /// The last message with a contact changed.
    Preview(UserId, Option<String>),
    /// The search text was edited.
    Search(String),
    /// The search was closed.
    ClearSearch,
}

/// What the contact list should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing received yet.
    Loading,
    /// Contacts exist but none match the search.
    NoMatches,
    Ready,
}

/// State of the contact list screen.
#[derive(Debug, Clone, Default)]
pub struct ContactsState {
    pub viewer: UserId,
    pub contacts: Vec<Contact>,
    pub query: String,
    previews: HashMap<UserId, Option<String>>,
}

impl ContactsState {
    pub fn new(viewer: impl Into<UserId>) -> Self {
        Self {
            viewer: viewer.into(),
            ..Default::default()
        }
    }

    /// Apply one event.
    pub fn apply(&mut self, event: ContactsEvent) {
        match event {
            ContactsEvent::Contacts(contacts) => self.contacts = contacts,
            ContactsEvent::Preview(uid, text) => {
                self.previews.insert(uid, text);
            }
            ContactsEvent::Search(query) => self.query = query,
            ContactsEvent::ClearSearch => self.query.clear(),
        }
    }

    /// Contacts to list: matching the search, without the viewer.
    pub fn visible(&self) -> Vec<&Contact> {
        filter_contacts(&self.contacts, &self.query, &self.viewer)
    }

    /// Preview line for a contact.
    pub fn preview_for(&self, uid: &UserId) -> String {
        preview_text(self.previews.get(uid).and_then(|t| t.as_deref()))
    }

    pub fn status(&self) -> ListStatus {
        if !self.visible().is_empty() {
            ListStatus::Ready
        } else if self.contacts.is_empty() {
            ListStatus::Loading
        } else {
            ListStatus::NoMatches
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_messages_rebuild_timeline() {
        let mut state = ChatState::new("u1");
        let message = Message {
            id: "a".into(),
            sender_id: "u1".into(),
            receiver_id: "u2".into(),
            text: "hello".into(),
            timestamp: Some(1_709_543_100_000),
            ..Default::default()
        };

        state.apply(ChatEvent::Messages(vec![message.clone(), message]));

        assert_eq!(state.timeline.groups.len(), 1);
        assert_eq!(state.timeline.len(), 2);
        assert!(state.timeline.groups[0].entries[0].is_own);

        state.apply(ChatEvent::Messages(Vec::new()));
        assert!(state.timeline.is_empty());
    }

    #[test]
    fn test_draft_handling() {
        let mut state = ChatState::new("u1");
        state.apply(ChatEvent::DraftChanged("  ".into()));
        assert_eq!(state.take_draft(), None);

        state.apply(ChatEvent::DraftChanged("hi ".into()));
        state.apply(ChatEvent::EmojiPicked("😊".into()));
        assert_eq!(state.take_draft().as_deref(), Some("hi 😊"));
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_header_name() {
        let mut state = ChatState::new("u1");
        assert_eq!(state.header_name(), "No name");

        state.apply(ChatEvent::Contact(Some(Contact::new("u2").with_name("Ada"))));
        assert_eq!(state.header_name(), "Ada");
    }

    #[test]
    fn test_contacts_status() {
        let mut state = ContactsState::new("u1");
        assert_eq!(state.status(), ListStatus::Loading);

        state.apply(ContactsEvent::Contacts(vec![
            Contact::new("u1").with_name("Me"),
            Contact::new("u2").with_name("Ada"),
        ]));
        assert_eq!(state.status(), ListStatus::Ready);
        assert_eq!(state.visible().len(), 1);

        state.apply(ContactsEvent::Search("zzz".into()));
        assert_eq!(state.status(), ListStatus::NoMatches);

        state.apply(ContactsEvent::ClearSearch);
        assert_eq!(state.status(), ListStatus::Ready);
    }

    #[test]
    fn test_previews() {
        let mut state = ContactsState::new("u1");
        let u2 = UserId::from("u2");
        assert_eq!(state.preview_for(&u2), "No messages yet");

        state.apply(ContactsEvent::Preview(u2.clone(), Some("see you".into())));
        assert_eq!(state.preview_for(&u2), "see you");
    }
}
