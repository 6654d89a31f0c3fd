//! Read receipts.
//!
//! Every refresh of a conversation scans for messages addressed to the viewer
//! that are not yet seen and issues one "mark as read" write per message. The
//! writes run in the background: rendering never waits on them and a failed
//! write is only logged. A write may be repeated on the next refresh while the
//! flag has not propagated yet; setting a flag that is already true is a
//! no-op on the store.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::{ConversationId, Message, MessageId, UserId};
use crate::store::{RemoteStore, StorePath};

/// Record field holding the read flag.
pub const SEEN_FIELD: &str = "isSeen";

/// Messages the viewer still has to acknowledge, in input order.
pub fn pending_receipts(messages: &[Message], viewer: &UserId) -> Vec<MessageId> {
    messages
        .iter()
        .filter(|m| m.needs_receipt(viewer))
        .map(|m| m.id.clone())
        .collect()
}

/// Set the read flag on one message.
pub async fn mark_read(
    store: &dyn RemoteStore,
    conversation: &ConversationId,
    id: &MessageId,
) -> Result<()> {
    let mut fields = Map::new();
    fields.insert(SEEN_FIELD.into(), Value::Bool(true));
    store
        .update(&StorePath::message(conversation, id), fields)
        .await
}

/// Issues read receipts for one conversation.
#[derive(Debug)]
pub struct ReceiptDispatcher {
    store: Arc<dyn RemoteStore>,
    conversation: ConversationId,
    in_flight: Vec<JoinHandle<()>>,
}

impl ReceiptDispatcher {
    pub fn new(store: Arc<dyn RemoteStore>, conversation: ConversationId) -> Self {
        Self {
            store,
            conversation,
            in_flight: Vec::new(),
        }
    }

    /// Start one receipt write per pending message. Returns how many were
    /// started.
    ///
    /// Outside a tokio runtime nothing is started.
    pub fn dispatch(&mut self, messages: &[Message], viewer: &UserId) -> usize {
        self.in_flight.retain(|handle| !handle.is_finished());

        let pending = pending_receipts(messages, viewer);
        if pending.is_empty() {
            return 0;
        }

        let Ok(runtime) = Handle::try_current() else {
            log::warn!(
                "No async runtime, skipping {} receipt(s) in {}",
                pending.len(),
                self.conversation
            );
            return 0;
        };

        let mut started = 0;
        for id in pending {
            if id.is_empty() {
                log::debug!("Skipping receipt for message without key");
                continue;
            }

            let store = self.store.clone();
            let conversation = self.conversation.clone();
            self.in_flight.push(runtime.spawn(async move {
                if let Err(e) = mark_read(store.as_ref(), &conversation, &id).await {
                    log::warn!(
                        "Failed to mark message {} in {} as read: {}",
                        id,
                        conversation,
                        e
                    );
                }
            }));
            started += 1;
        }
        started
    }

    /// Number of writes that have not completed yet.
    pub fn pending(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every started write to finish.
    pub async fn flush(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                log::warn!("Receipt task ended abnormally: {}", e);
            }
        }
    }
}
