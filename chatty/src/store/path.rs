//! Store paths.

use std::fmt;

use crate::models::{ConversationId, MessageId, UserId};

/// A slash-separated location in the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath(Vec<String>);

impl StorePath {
    /// The root of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path such as `users/u1`. Empty segments are ignored.
    pub fn parse(raw: &str) -> Self {
        StorePath(
            raw.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Append a segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        StorePath(segments)
    }

    /// Path segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last segment, if any.
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Check if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Check whether `other` equals this path or lies below it.
    pub fn contains(&self, other: &StorePath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Check whether one path lies on the branch of the other.
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// `users`
    pub fn users() -> Self {
        StorePath(vec!["users".into()])
    }

    /// `users/{uid}`
    pub fn user(uid: &UserId) -> Self {
        Self::users().child(uid.as_str())
    }

    /// `users/{uid}/{field}`
    pub fn user_field(uid: &UserId, field: &str) -> Self {
        Self::user(uid).child(field)
    }

    /// `chats/{conversation}/messages`
    pub fn messages(conversation: &ConversationId) -> Self {
        StorePath(vec![
            "chats".into(),
            conversation.as_str().to_owned(),
            "messages".into(),
        ])
    }

    /// `chats/{conversation}/messages/{id}`
    pub fn message(conversation: &ConversationId, id: &MessageId) -> Self {
        Self::messages(conversation).child(id.as_str())
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}
