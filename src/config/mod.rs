use std::time::Duration;

use url::Url;

use crate::errors::{FeedError, FeedResult};

pub const DEFAULT_PAGE_SIZE: u32 = 9;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub page_size: u32,
    pub timeout: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> FeedResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> FeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("FEEDSCROLL_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FeedError::MissingEnvVar("FEEDSCROLL_API_URL".to_string()))?;

        let parsed = Url::parse(api_url.trim()).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FeedError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let api_token = lookup("FEEDSCROLL_API_TOKEN").filter(|v| !v.trim().is_empty());

        let page_size = match lookup("FEEDSCROLL_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match lookup("FEEDSCROLL_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: api_url.trim().to_string(),
            api_token,
            page_size,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn parse_page_size(raw: &str) -> FeedResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(FeedError::Config("page size must be at least 1".to_string())),
        Ok(size) => Ok(size),
        Err(_) => Err(FeedError::Config(format!("page size is not a number: {}", raw))),
    }
}

fn parse_timeout_secs(raw: &str) -> FeedResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(FeedError::Config(
            "FEEDSCROLL_TIMEOUT_SECS must be at least 1".to_string(),
        )),
        Ok(secs) => Ok(secs),
        Err(_) => Err(FeedError::Config(format!(
            "FEEDSCROLL_TIMEOUT_SECS is not a number: {}",
            raw
        ))),
    }
}
