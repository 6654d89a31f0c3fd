//! Profile commands.

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::{build_authed_client, load_config, save_config};
use crate::handlers::profile;
use crate::output::{print_json, OutputFormat, PlainPrint};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show your profile
    Show,

    /// Change your display name
    Rename {
        /// New display name
        name: String,
    },

    /// Publish your contact record so others can find you
    Register,
}

pub async fn handle(action: ProfileAction, format: OutputFormat, verbose: bool) -> Result<()> {
    match action {
        ProfileAction::Show => show(format).await,
        ProfileAction::Rename { name } => rename(&name, format, verbose).await,
        ProfileAction::Register => register(format).await,
    }
}

async fn show(format: OutputFormat) -> Result<()> {
    let ws = build_authed_client()?;
    let info = profile::show_profile(&ws.client).await?;

    match format {
        OutputFormat::Json => print_json(&info),
        _ => info.plain_print(),
    }
    Ok(())
}

async fn rename(name: &str, format: OutputFormat, verbose: bool) -> Result<()> {
    let ws = build_authed_client()?;
    let result = profile::rename(&ws.client, name).await?;
    ws.save()?;

    if result.mirrored {
        let mut cfg = load_config()?;
        if let Some(auth) = cfg.auth.as_mut() {
            auth.display_name = Some(result.display_name.clone());
        }
        save_config(&cfg)?;
    }

    match format {
        OutputFormat::Json => print_json(&result),
        _ => {
            println!("Display name set to {}", result.display_name.bold());
            if verbose && !result.mirrored {
                println!("{}", "Sign-in profile was not updated".yellow());
            }
        }
    }
    Ok(())
}

async fn register(format: OutputFormat) -> Result<()> {
    let ws = build_authed_client()?;
    ws.client.users().register().await?;
    ws.save()?;

    let info = profile::show_profile(&ws.client).await?;
    match format {
        OutputFormat::Json => print_json(&info),
        _ => println!("Registered as {}", info.display_name.bold()),
    }
    Ok(())
}
