use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::ProxyError;
use crate::provider::MediaApi;
use crate::provider_xai::XaiMediaApi;

pub type SharedState = Arc<AppState>;

/// Per-process state. Requests share nothing mutable; the only member
/// is the upstream client, absent when no credential was configured.
#[derive(Clone)]
pub struct AppState {
    pub media: Option<Arc<dyn MediaApi>>,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let media = match cfg.api_key.as_deref() {
            Some(key) => Some(Arc::new(XaiMediaApi::from_config(cfg, key)?) as Arc<dyn MediaApi>),
            None => None,
        };
        Ok(Self { media })
    }

    pub fn with_media(media: Arc<dyn MediaApi>) -> Self {
        Self { media: Some(media) }
    }

    pub fn unconfigured() -> Self {
        Self { media: None }
    }

    pub fn media(&self) -> Result<&dyn MediaApi, ProxyError> {
        self.media.as_deref().ok_or(ProxyError::Configuration)
    }
}
