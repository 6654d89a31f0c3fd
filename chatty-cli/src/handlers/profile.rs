//! Profile handlers.

use anyhow::{Context, Result};
use chatty::ChatClient;
use colored::Colorize;
use serde::Serialize;

use crate::output::PlainPrint;

/// The signed-in user's profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub uid: String,
    pub display_name: String,
    pub email: Option<String>,
    pub photo_url: String,
    /// Whether the user has published a record yet.
    pub registered: bool,
}

impl PlainPrint for ProfileInfo {
    fn plain_print(&self) {
        println!(
            "{} {}",
            self.display_name.bold(),
            format!("[{}]", self.uid).cyan()
        );
        if let Some(email) = &self.email {
            println!("   {}", email);
        }
        println!("   {}", self.photo_url.dimmed());
        if !self.registered {
            println!("   {}", "not registered".yellow());
        }
    }
}

/// Rename result.
#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    pub uid: String,
    pub display_name: String,
    /// Whether the identity provider took the new name too.
    pub mirrored: bool,
}

/// Show the signed-in user's stored profile, falling back to the session.
pub async fn show_profile(client: &ChatClient) -> Result<ProfileInfo> {
    let session = client.session().context("Authentication required")?;
    let stored = client.users().get(session.uid.clone()).await?;
    let registered = stored.is_some();
    let contact = stored.unwrap_or_else(|| session.to_contact());

    Ok(ProfileInfo {
        uid: contact.uid.to_string(),
        display_name: contact.display_name_or_default().to_string(),
        email: contact.email.clone(),
        photo_url: contact.photo_or_placeholder().to_string(),
        registered,
    })
}

/// Change the signed-in user's display name.
pub async fn rename(client: &ChatClient, name: &str) -> Result<RenameResult> {
    let uid = client
        .current_uid()
        .context("Authentication required")?
        .to_string();
    let update = client.users().rename(name).await?;

    Ok(RenameResult {
        uid,
        display_name: update.display_name,
        mirrored: update.mirrored,
    })
}
