//! Two-party chat over a realtime document store.
//!
//! Conversations are keyed by [`conversation::resolve`], messages are turned
//! into day-grouped timelines by [`timeline::build_timeline`], and received
//! messages are acknowledged through [`receipts`].

pub mod api;
pub mod client;
pub mod conversation;
pub mod error;
pub mod models;
pub mod receipts;
pub mod state;
pub mod store;
pub mod timeline;

// Re-export main types
pub use client::{AuthInfo, AuthProvider, ChatClient, ChatClientBuilder, MemoryAuth};
pub use error::{Error, Result};

// Re-export commonly used models
pub use models::{Contact, ConversationId, Message, MessageId, MessageStatus, UserId};

// Re-export API types
pub use api::{ChatSession, ChatView, Feed, ProfileUpdate};
pub use conversation::resolve;
pub use store::{MemoryStore, RemoteStore, StorePath, Subscription};
pub use timeline::{build_timeline, DayGroup, Timeline, TimelineEntry, TimelineItem};
