//! Configuration loading for the OPSS dashboard.
//! Reads opss.toml from the current directory or the path in OPSS_CONFIG.

use std::path::{Path, PathBuf};

use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

pub const CONFIG_ENV: &str = "OPSS_CONFIG";
pub const TOKEN_ENV: &str = "OPSS_ACCESS_TOKEN";
const DEFAULT_CONFIG_FILE: &str = "opss.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// File the configuration was read from, `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host()       -> String  { "127.0.0.1".to_string() }
fn default_port()       -> u16     { 3001 }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,
    #[serde(default = "default_edges_path")]
    pub edges_path: PathBuf,
}

fn default_records_path() -> PathBuf { PathBuf::from("./data/records.csv") }
fn default_edges_path()   -> PathBuf { PathBuf::from("./data/edges.csv") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            edges_path: default_edges_path(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret for the gated pages. `None` denies every gated request.
    #[serde(default, deserialize_with = "secret_opt")]
    pub access_token: Option<SecretString>,
}

fn secret_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SecretString>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|t| !t.is_empty()).map(SecretString::from))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "bool_true")]
    pub show_lowest_layer: bool,
}

fn default_page_size() -> usize { opss_data::records::DEFAULT_PAGE_SIZE }
fn default_max_depth() -> usize { opss_hierarchy::DEFAULT_MAX_DEPTH }
fn bool_true()         -> bool  { true }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_depth: default_max_depth(),
            show_lowest_layer: bool_true(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_error_file")]
    pub error_file: String,
    #[serde(default = "default_usage_file")]
    pub usage_file: String,
    #[serde(default = "bool_true")]
    pub file_logging: bool,
}

fn default_log_dir()    -> PathBuf { PathBuf::from("./logs") }
fn default_error_file() -> String  { "OPSS_app.log".to_string() }
fn default_usage_file() -> String  { "OPSS_usage.log".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            error_file: default_error_file(),
            usage_file: default_usage_file(),
            file_logging: bool_true(),
        }
    }
}


impl Config {
    /// Load configuration from opss.toml.
    /// Checks OPSS_CONFIG first, then the current directory. A missing file
    /// falls back to defaults (`source` stays `None`); a malformed one is an
    /// error.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let token = std::env::var(TOKEN_ENV).ok();
        Self::load_from(Path::new(&path), token)
    }

    /// Load from an explicit path, with an optional token override.
    pub fn load_from(path: &Path, token_override: Option<String>) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let mut config = Self::from_toml(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?;
            config.source = Some(path.to_path_buf());
            config
        } else {
            Self::default()
        };

        if let Some(token) = token_override.filter(|t| !t.is_empty()) {
            config.security.access_token = Some(SecretString::from(token));
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
