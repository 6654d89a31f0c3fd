//! Chatty CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{chat, contact, profile};
use tracing_subscriber::EnvFilter;

/// Two-party chat over a local document store
#[derive(Parser)]
#[command(name = "chatty")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Contact operations
    #[command(alias = "c")]
    Contact {
        #[command(subcommand)]
        action: contact::ContactAction,
    },

    /// Chat operations
    #[command(alias = "m")]
    Chat {
        #[command(subcommand)]
        action: chat::ChatAction,
    },

    /// Profile operations
    #[command(alias = "p")]
    Profile {
        #[command(subcommand)]
        action: profile::ProfileAction,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in as a user and publish their contact record
    Login {
        /// User ID
        #[arg(short, long, env = "CHATTY_UID")]
        uid: String,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Avatar URL
        #[arg(long)]
        photo: Option<String>,
    },
    /// Logout
    Logout,
    /// Show current auth status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Auth { action } => handle_auth(action).await,
        Commands::Contact { action } => contact::handle(action, cli.format, cli.verbose).await,
        Commands::Chat { action } => chat::handle(action, cli.format, cli.verbose).await,
        Commands::Profile { action } => profile::handle(action, cli.format, cli.verbose).await,
        Commands::Config => {
            let cfg = config::load_config()?;
            println!("Config file: {}", config::config_path()?.display());
            println!("Data file: {}", config::data_path(&cfg)?.display());
            println!("Authenticated: {}", cfg.auth.is_some());
            if let Some(auth) = &cfg.auth {
                println!("User ID: {}", auth.uid);
            }
            Ok(())
        }
    }
}

async fn handle_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login {
            uid,
            name,
            email,
            photo,
        } => {
            let mut cfg = config::load_config()?;
            cfg.auth = Some(config::AuthConfig {
                uid: uid.clone(),
                display_name: name,
                email,
                photo_url: photo,
            });
            config::save_config(&cfg)?;

            let ws = config::build_authed_client()?;
            let contact = ws.client.users().register().await?;
            ws.save()?;
            tracing::debug!("Published contact record for {}", contact.uid);

            println!("Logged in as {}", contact.display_name_or_default());
            Ok(())
        }
        AuthAction::Logout => {
            let mut cfg = config::load_config()?;
            cfg.auth = None;
            config::save_config(&cfg)?;
            println!("Logged out");
            Ok(())
        }
        AuthAction::Status => {
            let cfg = config::load_config()?;
            if let Some(auth) = &cfg.auth {
                println!("Logged in as {}", auth.uid);
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
    }
}
