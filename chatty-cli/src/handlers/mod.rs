//! Shared handlers behind the CLI commands.

pub mod chat;
pub mod contact;
pub mod profile;
