//! Chat message models.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::record::{Fields, FromRecord, ToRecord};
use super::{MessageId, UserId};

/// Delivery status of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

impl MessageStatus {
    /// Parse a stored status string. Unknown values read as `Sent`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "delivered" => MessageStatus::Delivered,
            "read" => MessageStatus::Read,
            _ => MessageStatus::Sent,
        }
    }

    /// Get the stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Read => "read",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Store-generated key.
    pub id: MessageId,
    /// Sender user ID.
    pub sender_id: UserId,
    /// Receiver user ID.
    pub receiver_id: UserId,
    /// Message body.
    pub text: String,
    /// Send time in milliseconds since the epoch.
    pub timestamp: Option<i64>,
    /// Delivery status.
    pub status: MessageStatus,
    /// Whether the receiver has seen the message.
    pub is_seen: bool,
}

impl Message {
    /// Build a freshly sent message. The ID is assigned by the store.
    pub fn outgoing(
        sender: impl Into<UserId>,
        receiver: impl Into<UserId>,
        text: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: MessageId::default(),
            sender_id: sender.into(),
            receiver_id: receiver.into(),
            text: text.into(),
            timestamp: Some(now_ms),
            status: MessageStatus::Sent,
            is_seen: false,
        }
    }

    /// Whether this message renders as the viewer's own.
    pub fn is_from(&self, viewer: &UserId) -> bool {
        &self.sender_id == viewer
    }

    /// Whether the viewer still owes a read receipt for this message.
    pub fn needs_receipt(&self, viewer: &UserId) -> bool {
        &self.receiver_id == viewer && !self.is_seen
    }

    /// Timestamp, or `now_ms` when the record carried none.
    pub fn timestamp_or(&self, now_ms: i64) -> i64 {
        self.timestamp.unwrap_or(now_ms)
    }
}

impl FromRecord for Message {
    fn from_record(key: &str, value: &Value) -> Option<Self> {
        let fields = Fields::of(value)?;

        // The store key addresses the record; `uid` is only a copy of it.
        let id = match key {
            "" => fields.string_or_default("uid"),
            key => key.to_owned(),
        };

        Some(Self {
            id: id.into(),
            sender_id: fields.string_or_default("senderId").into(),
            receiver_id: fields.string_or_default("receiverId").into(),
            text: fields.string_or_default("text"),
            timestamp: fields.i64_opt("timestamp"),
            status: fields
                .string_opt("status")
                .map(|s| MessageStatus::parse(&s))
                .unwrap_or_default(),
            is_seen: fields.bool_or("isSeen", false),
        })
    }
}

impl ToRecord for Message {
    fn to_record(&self) -> Value {
        let mut record = json!({
            "senderId": self.sender_id.as_str(),
            "receiverId": self.receiver_id.as_str(),
            "text": self.text,
            "status": self.status.as_str(),
            "isSeen": self.is_seen,
        });
        if let Some(obj) = record.as_object_mut() {
            if !self.id.is_empty() {
                obj.insert("uid".into(), Value::from(self.id.as_str()));
            }
            if let Some(ts) = self.timestamp {
                obj.insert("timestamp".into(), Value::from(ts));
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outgoing_message() {
        let msg = Message::outgoing("u1", "u2", "hello", 1_000);

        assert_eq!(msg.status, MessageStatus::Sent);
        assert!(!msg.is_seen);
        assert_eq!(msg.receiver_id, "u2");
        assert_eq!(msg.timestamp, Some(1_000));
        assert!(msg.id.is_empty());
    }

    #[test]
    fn test_ownership_and_receipts() {
        let msg = Message::outgoing("u1", "u2", "hi", 0);
        let u1 = UserId::from("u1");
        let u2 = UserId::from("u2");

        assert!(msg.is_from(&u1));
        assert!(!msg.is_from(&u2));
        assert!(msg.needs_receipt(&u2));
        assert!(!msg.needs_receipt(&u1));

        let seen = Message {
            is_seen: true,
            ..msg
        };
        assert!(!seen.needs_receipt(&u2));
    }

    #[test]
    fn test_parse_full_record() {
        let value = json!({
            "uid": "-k1",
            "senderId": "u1",
            "receiverId": "u2",
            "text": "hello",
            "timestamp": 1709542800000i64,
            "status": "delivered",
            "isSeen": true,
        });
        let msg = Message::from_record("-k1", &value).unwrap();

        assert_eq!(msg.id, "-k1");
        assert_eq!(msg.timestamp, Some(1709542800000));
        assert_eq!(msg.status, MessageStatus::Delivered);
        assert!(msg.is_seen);
    }

    #[test]
    fn test_store_key_wins_over_uid_field() {
        let value = json!({ "uid": "legacy-id", "senderId": "u1", "text": "hi" });

        let msg = Message::from_record("-k1", &value).unwrap();
        assert_eq!(msg.id, "-k1");

        let detached = Message::from_record("", &value).unwrap();
        assert_eq!(detached.id, "legacy-id");
    }

    #[test]
    fn test_parse_partial_record_uses_defaults() {
        let value = json!({ "senderId": "u1", "text": null, "status": "weird" });
        let msg = Message::from_record("-key", &value).unwrap();

        assert_eq!(msg.id, "-key");
        assert_eq!(msg.text, "");
        assert!(msg.receiver_id.is_empty());
        assert_eq!(msg.timestamp, None);
        assert_eq!(msg.status, MessageStatus::Sent);
        assert!(!msg.is_seen);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(Message::from_record("k", &json!(42)).is_none());
    }

    #[test]
    fn test_record_field_names() {
        let msg = Message::outgoing("u1", "u2", "hello", 5);
        let record = msg.to_record();

        assert_eq!(record["senderId"], "u1");
        assert_eq!(record["receiverId"], "u2");
        assert_eq!(record["status"], "sent");
        assert_eq!(record["isSeen"], false);
        assert_eq!(record["timestamp"], 5);
        assert!(record.get("uid").is_none());
    }
}
