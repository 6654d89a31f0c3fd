//! Data models for chat entities.

mod contact;
mod ids;
mod message;
mod record;

pub use contact::{Contact, PLACEHOLDER_PHOTO, UNKNOWN_NAME};
pub use ids::{ConversationId, MessageId, UserId, CONVERSATION_SEPARATOR};
pub use message::{Message, MessageStatus};
pub use record::{parse_children, FromRecord, ToRecord};
