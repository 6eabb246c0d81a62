use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_EXTRACT_URL: &str = "http://127.0.0.1:5000/extract_sow";
const DEFAULT_RECOMMEND_URL: &str = "http://127.0.0.1:5000/recommend_employees_clean";

/// Application configuration loaded from environment variables.
/// Every key has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub extract_url: String,
    pub recommend_url: String,
    /// Upper bound for each collaborator call.
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Sessions untouched for longer than this are dropped.
    pub session_ttl: Duration,
    /// How often idle sessions are swept.
    pub session_sweep_interval: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_secs = var("REQUEST_TIMEOUT_SECS", "120")
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        let ttl_secs = var("SESSION_TTL_SECS", "1800")
            .parse::<u64>()
            .context("SESSION_TTL_SECS must be a whole number of seconds")?;
        let sweep_secs = var("SESSION_SWEEP_SECS", "60")
            .parse::<u64>()
            .context("SESSION_SWEEP_SECS must be a whole number of seconds")?;
        if ttl_secs == 0 || sweep_secs == 0 {
            bail!("SESSION_TTL_SECS and SESSION_SWEEP_SECS must be greater than zero");
        }

        Ok(Config {
            extract_url: var("SOW_EXTRACT_URL", DEFAULT_EXTRACT_URL),
            recommend_url: var("SOW_RECOMMEND_URL", DEFAULT_RECOMMEND_URL),
            request_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "20971520")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            session_ttl: Duration::from_secs(ttl_secs),
            session_sweep_interval: Duration::from_secs(sweep_secs),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
