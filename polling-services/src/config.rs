use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;

const SYNC_PATH: &str = "/api/sync";
const CLASSIFY_PATH: &str = "/api/classify";

/// Process-level settings, read once at startup
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub roster_path: PathBuf,
    pub sync_interval_seconds: u64,
    /// Zone that defines week boundaries; `None` means the system zone
    pub calendar_timezone: Option<Tz>,
    pub google: GoogleCalendarConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// Path to Google OAuth client credentials JSON file
    pub credentials_path: String,
    /// Path to store the OAuth token cache
    pub token_cache_path: String,
}

impl PollingConfig {
    pub fn from_env() -> Result<Self> {
        let calendar_timezone = match env::var("CALENDAR_TIMEZONE") {
            Ok(name) if !name.trim().is_empty() => Some(
                name.trim()
                    .parse::<Tz>()
                    .map_err(|e| anyhow::anyhow!("CALENDAR_TIMEZONE is not a valid zone: {}", e))?,
            ),
            _ => None,
        };

        Ok(Self {
            roster_path: env::var("ROSTER_PATH")
                .unwrap_or_else(|_| "roster.toml".to_string())
                .into(),
            sync_interval_seconds: env::var("SYNC_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .context("SYNC_INTERVAL_SECONDS must be a valid number")?,
            calendar_timezone,
            google: GoogleCalendarConfig {
                credentials_path: env::var("GOOGLE_CREDENTIALS_PATH")
                    .unwrap_or_else(|_| "credentials.json".to_string()),
                token_cache_path: env::var("GOOGLE_TOKEN_CACHE_PATH")
                    .unwrap_or_else(|_| "calendar_token_cache.json".to_string()),
            },
        })
    }
}

/// Remote endpoint settings, re-read before every push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSettings {
    pub sync_url: Option<String>,
    pub api_key: String,
    /// Explicit classify endpoint; derived from `sync_url` when unset
    pub classify_url: Option<String>,
}

impl SyncSettings {
    pub fn from_env() -> Self {
        Self {
            sync_url: non_empty_var("SYNC_URL"),
            api_key: env::var("SYNC_API_KEY").unwrap_or_default(),
            classify_url: non_empty_var("CLASSIFY_URL"),
        }
    }

    /// Classify endpoint: the explicit one, else the sync URL with its first
    /// `/api/sync` swapped for `/api/classify`.
    ///
    /// A sync URL without that path is used unchanged.
    pub fn classify_endpoint(&self) -> Option<String> {
        if let Some(url) = &self.classify_url {
            return Some(url.clone());
        }

        self.sync_url
            .as_deref()
            .map(|url| url.replacen(SYNC_PATH, CLASSIFY_PATH, 1))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where the dispatcher gets its [`SyncSettings`] from
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> SyncSettings;
}

/// Reads `SYNC_URL`, `SYNC_API_KEY` and `CLASSIFY_URL` on every call, so
/// changes apply to the next push without a restart.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn load(&self) -> SyncSettings {
        SyncSettings::from_env()
    }
}

impl SettingsSource for SyncSettings {
    fn load(&self) -> SyncSettings {
        self.clone()
    }
}
