use async_trait::async_trait;

use crate::types::{ImageEditResponse, VideoEditResponse, VideoProgress};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub base_url: String,
}

/// What the upstream said about one call.
///
/// `Err` from a [`MediaApi`] method is reserved for faults (transport,
/// undecodable success body); an upstream that answered with a
/// non-success status is a `Failed` reply.
#[derive(Debug, Clone)]
pub enum UpstreamReply<T> {
    Ready(T),
    Failed { status: u16, message: Option<String> },
}

/// The external media-editing service the proxy forwards to.
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn edit_image(
        &self,
        prompt: &str,
        image: &str,
    ) -> anyhow::Result<UpstreamReply<ImageEditResponse>>;

    async fn edit_video(
        &self,
        prompt: &str,
        video_url: &str,
    ) -> anyhow::Result<UpstreamReply<VideoEditResponse>>;

    async fn video_status(&self, request_id: &str) -> anyhow::Result<UpstreamReply<VideoProgress>>;

    fn info(&self) -> ProviderInfo;
}
