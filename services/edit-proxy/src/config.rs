use std::fmt;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "grok-imagine-image";
pub const DEFAULT_VIDEO_MODEL: &str = "grok-imagine-video";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub video_model: String,
    pub bind_addr: String,
    pub upstream_timeout: Duration,
    pub require_api_key: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("XAI_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let base_url = lookup("XAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let image_model =
            lookup("XAI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let video_model =
            lookup("XAI_VIDEO_MODEL").unwrap_or_else(|| DEFAULT_VIDEO_MODEL.to_string());
        let bind_addr =
            lookup("EDIT_PROXY_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("UPSTREAM_TIMEOUT_SECS must be a whole number of seconds, got {v:?}"))?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        let require_api_key = lookup("EDIT_PROXY_REQUIRE_API_KEY")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
            .unwrap_or(true);

        // Fail fast, fail loud
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("XAI_BASE_URL must start with http:// or https://");
        }
        if upstream_timeout == 0 {
            bail!("UPSTREAM_TIMEOUT_SECS must be greater than zero");
        }
        if require_api_key && api_key.is_none() {
            bail!("Missing required env var: XAI_API_KEY (set EDIT_PROXY_REQUIRE_API_KEY=false to start without it)");
        }

        Ok(Self {
            api_key,
            base_url,
            image_model,
            video_model,
            bind_addr,
            upstream_timeout: Duration::from_secs(upstream_timeout),
            require_api_key,
        })
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .field("bind_addr", &self.bind_addr)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("require_api_key", &self.require_api_key)
            .finish()
    }
}
