use anyhow::{Context, Result};
use polling_services::config::PollingConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Also run the periodic sync inside the server process
    pub enable_scheduler: bool,
    pub polling: PollingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            enable_scheduler: env::var("ENABLE_SCHEDULER")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
                .unwrap_or(false),
            polling: PollingConfig::from_env()?,
        })
    }
}
