//! Contact commands.

use anyhow::Result;
use clap::Subcommand;

use crate::config::build_authed_client;
use crate::handlers::contact;
use crate::output::{print_json, print_table, OutputFormat, PlainPrint};

#[derive(Subcommand)]
pub enum ContactAction {
    /// List contacts with their last message
    List {
        /// Only show contacts whose name or email contains this
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a contact
    Show {
        /// User ID
        uid: String,
    },
}

pub async fn handle(action: ContactAction, format: OutputFormat, _verbose: bool) -> Result<()> {
    match action {
        ContactAction::List { search } => list(search.as_deref(), format).await,
        ContactAction::Show { uid } => show(&uid, format).await,
    }
}

async fn list(search: Option<&str>, format: OutputFormat) -> Result<()> {
    let ws = build_authed_client()?;
    let result = contact::list_contacts(&ws.client, search).await?;

    if let OutputFormat::Json = format {
        print_json(&result);
        return Ok(());
    }

    if let Some(notice) = &result.notice {
        println!("{}", notice);
        return Ok(());
    }

    print_table(result.contacts, format);
    Ok(())
}

async fn show(uid: &str, format: OutputFormat) -> Result<()> {
    let ws = build_authed_client()?;
    let info = contact::show_contact(&ws.client, uid).await?;

    match format {
        OutputFormat::Plain => info.plain_print(),
        _ => print_table(vec![info], format),
    }
    Ok(())
}
