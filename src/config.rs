use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the room search service
    pub backend_url: String,
    /// Upper bound on a single fetch
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Pages the demo binary loads per search
    pub pages: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("room-scanner/", env!("CARGO_PKG_VERSION")).to_string(),
            pages: 1,
        }
    }
}

impl Config {
    /// Load config from `ROOM_SCANNER_*` variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Load config through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ROOM_SCANNER_BACKEND_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                anyhow::bail!("ROOM_SCANNER_BACKEND_URL is empty");
            }
            config.backend_url = url.to_string();
        }

        if let Some(secs) = lookup("ROOM_SCANNER_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid ROOM_SCANNER_TIMEOUT_SECS: {secs:?}"))?;
            if secs == 0 {
                anyhow::bail!("ROOM_SCANNER_TIMEOUT_SECS must be positive");
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(agent) = lookup("ROOM_SCANNER_USER_AGENT") {
            config.user_agent = agent;
        }

        if let Some(pages) = lookup("ROOM_SCANNER_PAGES") {
            config.pages = pages
                .trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid ROOM_SCANNER_PAGES: {pages:?}"))?
                .max(1);
        }

        Ok(config)
    }
}
