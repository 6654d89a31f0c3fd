//! Conversation identity.
//!
//! Both participants of a conversation must arrive at the same key no matter
//! who opens the chat, so the key is built from the two user IDs in ordinal
//! order.

use crate::error::{Error, Result};
use crate::models::{ConversationId, UserId, CONVERSATION_SEPARATOR};

/// Derive the canonical conversation ID for two participants.
///
/// The result is the smaller ID, a single space, then the larger ID.
/// Fails with [`Error::InvalidParticipants`] when either ID is empty or both
/// are the same user.
pub fn resolve(a: &UserId, b: &UserId) -> Result<ConversationId> {
    if a.is_empty() || b.is_empty() {
        return Err(Error::participants("participant ID cannot be empty"));
    }
    if a == b {
        return Err(Error::participants(format!(
            "{} cannot start a conversation with itself",
            a
        )));
    }

    let (low, high) = if a.as_str() < b.as_str() {
        (a, b)
    } else {
        (b, a)
    };

    Ok(ConversationId::new(format!(
        "{}{}{}",
        low, CONVERSATION_SEPARATOR, high
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(a: &str, b: &str) -> (UserId, UserId) {
        (UserId::from(a), UserId::from(b))
    }

    #[test]
    fn test_resolve_is_commutative() {
        let (u1, u2) = ids("u1", "u2");

        assert_eq!(resolve(&u1, &u2).unwrap(), "u1 u2");
        assert_eq!(resolve(&u2, &u1).unwrap(), "u1 u2");
    }

    #[test]
    fn test_resolve_uses_ordinal_order() {
        let (upper, lower) = ids("Zed", "abe");
        assert_eq!(resolve(&lower, &upper).unwrap(), "Zed abe");

        let (short, long) = ids("u2", "u10");
        assert_eq!(resolve(&short, &long).unwrap(), "u10 u2");
    }

    #[test]
    fn test_resolve_pairs() {
        let pairs = [
            ("alice", "bob"),
            ("xYz", "xyz"),
            ("0", "00"),
            ("k9BfQ2", "K9bfq2"),
        ];
        for (a, b) in pairs {
            let (a, b) = ids(a, b);
            assert_eq!(resolve(&a, &b).unwrap(), resolve(&b, &a).unwrap());
        }
    }

    #[test]
    fn test_self_conversation_rejected() {
        let u1 = UserId::from("u1");
        let err = resolve(&u1, &u1).unwrap_err();
        assert!(matches!(err, Error::InvalidParticipants(_)));
    }

    #[test]
    fn test_empty_participant_rejected() {
        let (empty, u1) = ids("", "u1");
        assert!(matches!(
            resolve(&empty, &u1),
            Err(Error::InvalidParticipants(_))
        ));
    }

    #[test]
    fn test_round_trip_participants() {
        let (a, b) = ids("u2", "u1");
        let id = resolve(&a, &b).unwrap();
        assert_eq!(id.participants(), Some((b, a)));
    }
}
