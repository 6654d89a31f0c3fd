//! API modules.

mod chat;
mod contact;
mod feed;
mod user;

pub use chat::{ChatApi, ChatSession, ChatView, SendMessageBuilder, ORDER_FIELD};
pub use contact::{filter_contacts, preview_text, ContactApi, NO_MESSAGES, PREVIEW_LIMIT};
pub use feed::Feed;
pub use user::{ProfileUpdate, UserApi, DISPLAY_NAME_FIELD};
