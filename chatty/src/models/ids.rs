//! Type-safe ID wrappers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                $name(id.into())
            }

            /// Check if this ID is empty.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_owned())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                $name(s.clone())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id!(UserId, "A participant identifier.");
define_id!(
    ConversationId,
    "Canonical identifier of a two-party conversation."
);
define_id!(MessageId, "A store-generated message key.");

/// Separator placed between the two participants of a conversation ID.
pub const CONVERSATION_SEPARATOR: char = ' ';

impl ConversationId {
    /// Split the ID back into its two participants.
    ///
    /// Returns `None` for IDs that were not produced by
    /// [`resolve`](crate::conversation::resolve).
    pub fn participants(&self) -> Option<(UserId, UserId)> {
        let (low, high) = self.0.split_once(CONVERSATION_SEPARATOR)?;
        if low.is_empty() || high.is_empty() {
            return None;
        }
        Some((UserId::from(low), UserId::from(high)))
    }

    /// Check whether the given user takes part in this conversation.
    pub fn involves(&self, user: &UserId) -> bool {
        self.participants()
            .map_or(false, |(a, b)| &a == user || &b == user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = UserId::new("u12345");
        assert_eq!(id.as_str(), "u12345");
        assert_eq!(format!("{}", id), "u12345");
        assert_eq!(id, "u12345");
    }

    #[test]
    fn test_id_is_empty() {
        assert!(UserId::new("").is_empty());
        assert!(!UserId::new("0").is_empty());
    }

    #[test]
    fn test_ordinal_ordering() {
        assert!(UserId::from("B") < UserId::from("a"));
        assert!(UserId::from("u1") < UserId::from("u10"));
        assert!(UserId::from("u10") < UserId::from("u2"));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&MessageId::from("-m1")).unwrap();
        assert_eq!(json, "\"-m1\"");
    }

    #[test]
    fn test_conversation_participants() {
        let id = ConversationId::from("u1 u2");
        assert_eq!(
            id.participants(),
            Some((UserId::from("u1"), UserId::from("u2")))
        );
        assert!(id.involves(&UserId::from("u2")));
        assert!(!id.involves(&UserId::from("u3")));
        assert_eq!(ConversationId::from("solo").participants(), None);
    }
}
