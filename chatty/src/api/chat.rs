//! Chat API.

use std::sync::Arc;

use crate::{
    api::Feed,
    client::ChatClientInner,
    conversation::resolve,
    error::Result,
    models::{ConversationId, Message, MessageId, UserId},
    receipts::{mark_read, ReceiptDispatcher},
    store::{Query, RemoteStoreExt, Snapshot, StorePath, Subscription},
    timeline::{build_timeline, now_millis, Timeline},
};

/// Child field messages are ordered by.
pub const ORDER_FIELD: &str = "timestamp";

/// API for one-to-one conversations of the signed-in user.
pub struct ChatApi {
    client: Arc<ChatClientInner>,
}

impl ChatApi {
    pub(crate) fn new(client: Arc<ChatClientInner>) -> Self {
        Self { client }
    }

    /// Conversation ID between the viewer and `other`.
    pub fn conversation_with(&self, other: &UserId) -> Result<ConversationId> {
        resolve(self.client.viewer()?, other)
    }

    /// Send a message to `receiver`.
    pub fn send_to(&self, receiver: impl Into<UserId>) -> SendMessageBuilder {
        SendMessageBuilder {
            client: self.client.clone(),
            receiver: receiver.into(),
            text: String::new(),
            timestamp: None,
        }
    }

    /// Open the conversation with `other` and start listening for messages.
    pub async fn open(&self, other: impl Into<UserId>) -> Result<ChatSession> {
        let viewer = self.client.viewer()?.clone();
        let conversation = resolve(&viewer, &other.into())?;

        let subscription = self
            .client
            .store
            .subscribe(Query::new(StorePath::messages(&conversation)).order_by(ORDER_FIELD))
            .await?;

        log::debug!("Opened conversation {}", conversation);

        Ok(ChatSession {
            receipts: ReceiptDispatcher::new(self.client.store.clone(), conversation.clone()),
            viewer,
            conversation,
            subscription,
            messages: Vec::new(),
        })
    }

    /// Follow the text of the most recent message exchanged with `other`.
    pub async fn last_message(&self, other: impl Into<UserId>) -> Result<Feed<Option<String>>> {
        let conversation = self.conversation_with(&other.into())?;

        let subscription = self
            .client
            .store
            .subscribe(
                Query::new(StorePath::messages(&conversation))
                    .order_by(ORDER_FIELD)
                    .limit_to_last(1),
            )
            .await?;

        Ok(Feed::new(subscription, last_text))
    }

    /// Mark one message as read.
    pub async fn mark_read(&self, conversation: &ConversationId, id: &MessageId) -> Result<()> {
        mark_read(self.client.store.as_ref(), conversation, id).await
    }
}

fn last_text(snapshot: Result<Snapshot>) -> Option<String> {
    match snapshot {
        Ok(snapshot) => snapshot.parse_children::<Message>().pop().map(|m| m.text),
        Err(e) => {
            log::warn!("Error fetching last message: {}", e);
            None
        }
    }
}

/// Builder for sending messages.
pub struct SendMessageBuilder {
    client: Arc<ChatClientInner>,
    receiver: UserId,
    text: String,
    timestamp: Option<i64>,
}

impl SendMessageBuilder {
    /// Set the message text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Use a fixed send time instead of the current time.
    pub fn at(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = Some(timestamp_ms);
        self
    }

    /// Execute the request.
    ///
    /// Blank text sends nothing and returns `Ok(None)`.
    pub async fn send(self) -> Result<Option<Message>> {
        if self.text.trim().is_empty() {
            log::debug!("Ignoring blank message to {}", self.receiver);
            return Ok(None);
        }

        let sender = self.client.viewer()?;
        let conversation = resolve(sender, &self.receiver)?;

        let mut message = Message::outgoing(
            sender.clone(),
            self.receiver,
            self.text,
            self.timestamp.unwrap_or_else(now_millis),
        );
        message.id = self.client.store.generate_key().into();

        self.client
            .store
            .set_record(&StorePath::message(&conversation, &message.id), &message)
            .await?;

        Ok(Some(message))
    }
}

/// What a conversation looks like after one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatView {
    pub conversation: ConversationId,
    /// Messages in delivery order.
    pub messages: Vec<Message>,
    pub timeline: Timeline,
    /// Read receipts started by this refresh.
    pub receipts_requested: usize,
}

/// An open conversation.
///
/// Each store notification replaces the whole message buffer, issues the
/// viewer's pending read receipts and rebuilds the timeline. Dropping the
/// session releases the store subscription.
#[derive(Debug)]
pub struct ChatSession {
    viewer: UserId,
    conversation: ConversationId,
    subscription: Subscription,
    messages: Vec<Message>,
    receipts: ReceiptDispatcher,
}

impl ChatSession {
    /// The conversation ID.
    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// The viewer's user ID.
    pub fn viewer(&self) -> &UserId {
        &self.viewer
    }

    /// Messages from the last refresh.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Wait for the next notification. `None` once the subscription ended.
    pub async fn next(&mut self) -> Option<ChatView> {
        let snapshot = self.subscription.next().await?;
        Some(self.refresh(snapshot))
    }

    /// Apply every notification that has already arrived, returning the
    /// view of the newest one.
    pub fn latest(&mut self) -> Option<ChatView> {
        let mut view = None;
        while let Some(snapshot) = self.subscription.try_next() {
            view = Some(self.refresh(snapshot));
        }
        view
    }

    /// Apply one notification.
    ///
    /// A failed notification is logged and shows as an empty conversation.
    pub fn refresh(&mut self, snapshot: Result<Snapshot>) -> ChatView {
        self.messages = match snapshot {
            Ok(snapshot) => snapshot.parse_children(),
            Err(e) => {
                log::warn!("Error fetching messages for {}: {}", self.conversation, e);
                Vec::new()
            }
        };

        let receipts_requested = self.receipts.dispatch(&self.messages, &self.viewer);

        ChatView {
            conversation: self.conversation.clone(),
            timeline: build_timeline(&self.messages, &self.viewer),
            messages: self.messages.clone(),
            receipts_requested,
        }
    }

    /// Wait for in-flight read receipts.
    pub async fn flush_receipts(&mut self) {
        self.receipts.flush().await;
    }

    /// Release the subscription.
    pub fn close(self) {}
}
