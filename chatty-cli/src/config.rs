//! Configuration management for chatty CLI.

use anyhow::{Context, Result};
use chatty::{AuthInfo, ChatClient, MemoryAuth, MemoryStore};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default store file name, next to the executable.
const DEFAULT_DATA_FILE: &str = "chatty-data.json";

/// CLI configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Signed-in user.
    pub auth: Option<AuthConfig>,
    /// Where the local store is kept.
    pub data_path: Option<PathBuf>,
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// User ID.
    pub uid: String,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
}

impl AuthConfig {
    pub fn to_auth_info(&self) -> AuthInfo {
        AuthInfo {
            uid: self.uid.as_str().into(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

fn exe_dir() -> Result<PathBuf> {
    let exe_path = env::current_exe().context("Could not determine executable path")?;
    let exe_dir = exe_path
        .parent()
        .context("Could not determine executable directory")?;
    Ok(exe_dir.to_path_buf())
}

/// Get the configuration file path.
pub fn config_path() -> Result<PathBuf> {
    Ok(exe_dir()?.join("chatty.toml"))
}

/// Load configuration from file.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).context("Failed to read config file")?;

    toml::from_str(&content).context("Failed to parse config file")
}

/// Save configuration to file.
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content).context("Failed to write config file")?;

    Ok(())
}

/// Get the store file path.
pub fn data_path(config: &Config) -> Result<PathBuf> {
    match &config.data_path {
        Some(path) => Ok(path.clone()),
        None => Ok(exe_dir()?.join(DEFAULT_DATA_FILE)),
    }
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        return Ok(MemoryStore::new());
    }

    let content = fs::read_to_string(path).context("Failed to read data file")?;
    let tree = serde_json::from_str(&content).context("Failed to parse data file")?;

    Ok(MemoryStore::from_snapshot(tree))
}

/// A client over the local store, plus what is needed to persist it.
pub struct Workspace {
    pub client: ChatClient,
    pub store: Arc<MemoryStore>,
    data_path: PathBuf,
}

impl Workspace {
    /// Write the store back to disk.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.store.snapshot())
            .context("Failed to serialize data")?;

        fs::write(&self.data_path, content).context("Failed to write data file")?;

        Ok(())
    }
}

/// Open the local store; fails when nobody is signed in.
pub fn build_authed_client() -> Result<Workspace> {
    let config = load_config()?;

    let auth = config
        .auth
        .as_ref()
        .context("Authentication required. Run 'chatty auth login' first.")?;

    open(&config, auth)
}

fn open(config: &Config, auth: &AuthConfig) -> Result<Workspace> {
    let data_path = data_path(config)?;
    let store = Arc::new(load_store(&data_path)?);

    let client = ChatClient::builder()
        .store(store.clone())
        .auth(Arc::new(MemoryAuth::signed_in(auth.to_auth_info())))
        .build()
        .context("Failed to build chat client")?;

    Ok(Workspace {
        client,
        store,
        data_path,
    })
}
