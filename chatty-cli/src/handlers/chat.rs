//! Chat handlers.

use anyhow::Result;
use chatty::state::{ChatEvent, ChatState};
use chatty::{ChatClient, TimelineItem, UserId};
use colored::Colorize;
use serde::Serialize;

use crate::output::{format_time, PlainPrint, TableRow};

/// One message as listed.
#[derive(Debug, Clone, Serialize)]
pub struct MessageInfo {
    pub id: String,
    pub day: String,
    pub time: String,
    pub from: String,
    pub is_own: bool,
    pub text: String,
    pub status: String,
    pub is_seen: bool,
}

impl TableRow for MessageInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Day", "Time", "From", "Message", "Seen"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.day.clone(),
            self.time.clone(),
            self.from.clone(),
            self.text.clone(),
            if self.is_seen {
                "✓".to_string()
            } else {
                String::new()
            },
        ]
    }
}

impl PlainPrint for MessageInfo {
    fn plain_print(&self) {
        if self.is_own {
            let bubble = format!("{} {}", self.text, self.time.dimmed());
            println!("{:>60}", bubble.blue());
        } else {
            println!("{} {}", self.text, self.time.dimmed());
        }
    }
}

/// Conversation read result.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationResult {
    pub conversation: String,
    pub contact: String,
    pub days: Vec<String>,
    pub messages: Vec<MessageInfo>,
    pub receipts_sent: usize,
}

impl ConversationResult {
    /// Print day headers followed by their messages.
    pub fn plain_print(&self) {
        let mut day = None;
        for message in &self.messages {
            if day != Some(&message.day) {
                println!("\n{:^60}", message.day.bold().dimmed());
                day = Some(&message.day);
            }
            message.plain_print();
        }
        if self.messages.is_empty() {
            println!("No messages yet");
        }
    }
}

/// Send message result.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResult {
    pub conversation: String,
    pub id: String,
    pub to: String,
    pub sent_at: String,
}

/// Read a conversation and acknowledge received messages.
pub async fn read_conversation(client: &ChatClient, other: &str) -> Result<ConversationResult> {
    let mut session = client.chats().open(other).await?;
    let mut state = ChatState::new(session.viewer().clone());

    let view = session.next().await.unwrap_or_default();
    state.apply(ChatEvent::Messages(view.messages));
    state.apply(ChatEvent::Contact(client.users().get(other).await?));

    session.flush_receipts().await;

    let me = session.viewer().clone();
    let mut messages = Vec::with_capacity(state.timeline.len());
    let mut day = String::new();
    for item in state.timeline.items() {
        match item {
            TimelineItem::DayHeader(label) => day = label.to_string(),
            TimelineItem::Bubble(entry) => messages.push(MessageInfo {
                id: entry.message.id.to_string(),
                day: day.clone(),
                time: entry.time.clone(),
                from: sender_name(&entry.message.sender_id, &me, state.header_name()),
                is_own: entry.is_own,
                text: entry.message.text.clone(),
                status: entry.message.status.as_str().to_string(),
                is_seen: entry.message.is_seen,
            }),
        }
    }

    Ok(ConversationResult {
        conversation: session.conversation().to_string(),
        contact: state.header_name().to_string(),
        days: state.timeline.labels().iter().map(|s| s.to_string()).collect(),
        messages,
        receipts_sent: view.receipts_requested,
    })
}

fn sender_name(sender: &UserId, me: &UserId, contact: &str) -> String {
    if sender == me {
        "You".to_string()
    } else {
        contact.to_string()
    }
}

/// Send a message. Blank text sends nothing.
pub async fn send_message(
    client: &ChatClient,
    to: &str,
    text: &str,
) -> Result<Option<SendMessageResult>> {
    let sent = client.chats().send_to(to).text(text).send().await?;
    let conversation = client.chats().conversation_with(&to.into())?;

    Ok(sent.map(|message| SendMessageResult {
        conversation: conversation.to_string(),
        id: message.id.to_string(),
        to: to.to_string(),
        sent_at: format_time(message.timestamp),
    }))
}

/// Conversation ID for two users.
pub fn conversation_id(a: &str, b: &str) -> Result<String> {
    Ok(chatty::resolve(&a.into(), &b.into())?.to_string())
}
