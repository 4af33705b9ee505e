use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Movie catalog endpoint and image paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_poster_size")]
    pub poster_size: String,
    /// Environment variable holding the v4 read-access (bearer) token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiescence window before typed text becomes a committed query.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingBackendKind {
    #[default]
    File,
    Appwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingConfig {
    #[serde(default)]
    pub backend: TrendingBackendKind,
    /// How many records the trending section shows.
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
    #[serde(default = "default_store_file")]
    pub store_file: PathBuf,
    #[serde(default)]
    pub appwrite: AppwriteConfig,
}

/// Hosted document database used by the original web front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppwriteConfig {
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub database_id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default = "default_appwrite_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            image_base_url: default_image_base_url(),
            poster_size: default_poster_size(),
            token_env: default_token_env(),
        }
    }
}

impl TmdbConfig {
    /// Full poster URL for a catalog `poster_path` such as `/abc.jpg`.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}{}",
            self.image_base_url.trim_end_matches('/'),
            self.poster_size,
            poster_path
        )
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            backend: TrendingBackendKind::default(),
            limit: default_trending_limit(),
            store_file: default_store_file(),
            appwrite: AppwriteConfig::default(),
        }
    }
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: default_appwrite_endpoint(),
            project_id: String::new(),
            database_id: String::new(),
            collection_id: String::new(),
            api_key_env: default_appwrite_key_env(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_poster_size() -> String {
    "w500".to_string()
}

fn default_token_env() -> String {
    "TMDB_API_TOKEN".to_string()
}

fn default_debounce_ms() -> u64 {
    800
}

fn default_trending_limit() -> usize {
    5
}

fn default_store_file() -> PathBuf {
    platform::data_dir().join("trending.json")
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_appwrite_key_env() -> String {
    "APPWRITE_API_KEY".to_string()
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

/// Secrets resolved from the environment once at start-up and handed to the
/// clients that need them. Never written back to `config.toml`.
#[derive(Clone, Default)]
pub struct ApiCredentials {
    pub tmdb_token: String,
    pub appwrite_key: Option<String>,
}

impl ApiCredentials {
    pub fn from_env(config: &Config) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(config: &Config, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tmdb_token = lookup(&config.tmdb.token_env)
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        let appwrite_key = lookup(&config.trending.appwrite.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            tmdb_token,
            appwrite_key,
        }
    }

    pub fn has_tmdb_token(&self) -> bool {
        !self.tmdb_token.is_empty()
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("tmdb_token", &if self.has_tmdb_token() { "<set>" } else { "<unset>" })
            .field("appwrite_key", &self.appwrite_key.as_ref().map(|_| "<set>"))
            .finish()
    }
}
