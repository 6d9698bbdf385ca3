use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "inkwell";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TOKEN_FILE_NAME: &str = "token";

pub const DEFAULT_API_URL: &str = "https://api.github.com/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repository holding the site, as "owner/name"
    pub repo: String,
    /// The only identity allowed to edit; tokens resolving to anyone else
    /// are rejected and cleared
    pub owner: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Folder within the repository that holds the posts
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    /// API base URL override (GitHub Enterprise, tests)
    #[serde(default)]
    pub api_url: Option<Url>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_posts_dir() -> String {
    "_posts".to_string()
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the inkwell directory (~/.inkwell)
    pub app_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the credential slot
    pub token_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the inkwell directory path (custom or default ~/.inkwell)
    pub fn app_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }
        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new inkwell state directory
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        if app_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }
        fs::create_dir_all(&app_dir)?;

        let config_path = app_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        let token_path = app_dir.join(TOKEN_FILE_NAME);

        Ok(Self {
            app_dir,
            config_path,
            token_path,
            config,
        })
    }

    /// Load existing state from the inkwell directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let app_dir = Self::app_dir(custom_path)?;

        let config_path = app_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            app_dir: app_dir.clone(),
            config_path,
            token_path: app_dir.join(TOKEN_FILE_NAME),
            config,
        })
    }

    /// Resolved API base URL: config override or the public endpoint.
    pub fn api_url(&self) -> Url {
        self.config
            .api_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_API_URL).expect("hardcoded URL must parse"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("inkwell directory not initialized. Run 'inkwell init' first")]
    NotInitialized,

    #[error("inkwell directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
