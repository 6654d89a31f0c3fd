//! Chat commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::build_authed_client;
use crate::handlers::chat;
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Read a conversation, marking received messages as seen
    Read {
        /// The other user's ID
        uid: String,
    },

    /// Send a message
    Send {
        /// Recipient user ID
        uid: String,
        /// Message text
        text: String,
    },

    /// Print the conversation ID shared by two users
    Id {
        /// First user ID
        a: String,
        /// Second user ID
        b: String,
    },
}

pub async fn handle(action: ChatAction, format: OutputFormat, verbose: bool) -> Result<()> {
    match action {
        ChatAction::Read { uid } => read(&uid, format, verbose).await,
        ChatAction::Send { uid, text } => send(&uid, &text, format).await,
        ChatAction::Id { a, b } => {
            println!("{}", chat::conversation_id(&a, &b)?);
            Ok(())
        }
    }
}

async fn read(uid: &str, format: OutputFormat, verbose: bool) -> Result<()> {
    let ws = build_authed_client()?;
    let result = chat::read_conversation(&ws.client, uid).await?;
    if result.receipts_sent > 0 {
        ws.save()?;
    }

    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Table => print_table(result.messages, format),
        OutputFormat::Plain => {
            println!("{}", result.contact.bold());
            if verbose {
                println!("{}", result.conversation.dimmed());
            }
            result.plain_print();
            if verbose && result.receipts_sent > 0 {
                println!("\n{} message(s) marked as seen", result.receipts_sent);
            }
        }
    }
    Ok(())
}

async fn send(uid: &str, text: &str, format: OutputFormat) -> Result<()> {
    let ws = build_authed_client()?;

    let Some(sent) = chat::send_message(&ws.client, uid, text).await? else {
        println!("Nothing to send");
        return Ok(());
    };
    ws.save()?;

    match format {
        OutputFormat::Json => print_json(&sent),
        _ => println!("Sent to {} at {}", sent.to.bold(), sent.sent_at),
    }
    Ok(())
}
