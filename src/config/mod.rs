mod file_config;

pub use file_config::FileConfig;

use crate::catalog_lookup::DEFAULT_CATALOG_URL;
use crate::collection::DEFAULT_API_BASE_URL;
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USERNAME: &str = "russmck";
pub const DEFAULT_DELAY_SECS: u64 = 2;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Largest page size the collection API accepts.
pub const MAX_PER_PAGE: u32 = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "public";

pub const TOKEN_VAR: &str = "DISCOGS_TOKEN";
pub const USERNAME_VAR: &str = "DISCOGS_USERNAME";
pub const DEBUG_VAR: &str = "ENABLE_DEBUG";
pub const DELAY_VAR: &str = "DISCOGS_RATE_LIMIT_DELAY";

/// CLI arguments that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub username: Option<String>,
    pub delay_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
}

/// Settings read from environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub token: Option<String>,
    pub username: Option<String>,
    pub enable_debug: bool,
    pub delay_secs: Option<u64>,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let delay_secs = non_empty(DELAY_VAR)
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a whole number of seconds, got {:?}", DELAY_VAR, v))
            })
            .transpose()?;

        Ok(Self {
            token: non_empty(TOKEN_VAR),
            username: non_empty(USERNAME_VAR),
            enable_debug: non_empty(DEBUG_VAR).is_some_and(|v| v.trim().eq_ignore_ascii_case("true")),
            delay_secs,
        })
    }
}

/// Accept the outcome of loading a `.env` file. Only a missing file is
/// ignored, a malformed one is an error.
pub fn check_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

/// Settings for walking the collection.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub username: String,
    /// Pause between pages, also the backoff when a 429 has no `Retry-After`.
    pub delay: Duration,
    pub max_retries: u32,
    pub per_page: u32,
    pub api_base_url: String,
    pub request_timeout: Option<Duration>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            per_page: MAX_PER_PAGE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: String,
    pub output_dir: PathBuf,
    pub catalog_url: String,
    pub fetch: FetchSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments, environment and an optional
    /// TOML file. CLI wins over the file, the file wins over the environment.
    /// The access token only comes from the environment.
    pub fn resolve(cli: &CliConfig, env: &EnvConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let output_dir = resolve_output_dir(cli, Some(&file));

        let token = env
            .token
            .clone()
            .ok_or_else(|| anyhow!("Please set {} in your environment or .env file", TOKEN_VAR))?;

        let username = cli
            .username
            .clone()
            .or(file.username)
            .or_else(|| env.username.clone())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        let delay_secs = cli
            .delay_secs
            .or(file.delay_secs)
            .or(env.delay_secs)
            .unwrap_or(DEFAULT_DELAY_SECS);

        let per_page = file.per_page.unwrap_or(MAX_PER_PAGE);
        if per_page == 0 || per_page > MAX_PER_PAGE {
            bail!("per_page must be between 1 and {}, got {}", MAX_PER_PAGE, per_page);
        }

        let fetch = FetchSettings {
            username,
            delay: Duration::from_secs(delay_secs),
            max_retries: file.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            per_page,
            api_base_url: file
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            request_timeout: file.request_timeout_secs.map(Duration::from_secs),
        };

        Ok(Self {
            token,
            output_dir,
            catalog_url: file
                .catalog_url
                .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
            fetch,
        })
    }

    /// Path of the collection file for `year`.
    pub fn output_path(&self, year: i32) -> PathBuf {
        crate::writer::collection_path(&self.output_dir, year)
    }
}

/// Output directory from CLI, then file, then the default.
pub fn resolve_output_dir(cli: &CliConfig, file: Option<&FileConfig>) -> PathBuf {
    cli.output_dir
        .clone()
        .or_else(|| file.and_then(|f| f.output_dir.as_ref()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}
