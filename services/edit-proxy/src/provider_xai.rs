use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::provider::{MediaApi, ProviderInfo, UpstreamReply};
use crate::types::{
    ImageEditPayload, ImageEditResponse, ImageRef, UpstreamErrorBody, VideoEditPayload,
    VideoEditResponse, VideoProgress, VideoStatusResponse,
};

/// Client for the xAI media endpoints. The bearer key never leaves this struct.
pub struct XaiMediaApi {
    base_url: String,
    api_key: String,
    image_model: String,
    video_model: String,
    client: reqwest::Client,
}

impl XaiMediaApi {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        image_model: impl Into<String>,
        video_model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            image_model: image_model.into(),
            video_model: video_model.into(),
            client,
        })
    }

    pub fn from_config(cfg: &AppConfig, api_key: &str) -> anyhow::Result<Self> {
        Self::new(
            cfg.base_url.clone(),
            api_key,
            cfg.image_model.clone(),
            cfg.video_model.clone(),
            cfg.upstream_timeout,
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// `{base}/videos/{id}` with the id percent-encoded as a single segment.
    fn status_url(&self, request_id: &str) -> anyhow::Result<reqwest::Url> {
        // `push` drops dot segments, which would address `videos` itself.
        if matches!(request_id, "." | "..") {
            anyhow::bail!("request id {request_id:?} is not a path segment");
        }
        let mut url = reqwest::Url::parse(&self.url("videos")).context("Invalid upstream base URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Upstream base URL cannot carry a path"))?
            .push(request_id);
        Ok(url)
    }
}

#[async_trait]
impl MediaApi for XaiMediaApi {
    async fn edit_image(
        &self,
        prompt: &str,
        image: &str,
    ) -> anyhow::Result<UpstreamReply<ImageEditResponse>> {
        let body = ImageEditPayload {
            model: &self.image_model,
            prompt,
            image: ImageRef::url(image),
        };

        let resp = self
            .client
            .post(self.url("images/edits"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("images/edits request failed")?;

        read_reply(resp, "images/edits").await
    }

    async fn edit_video(
        &self,
        prompt: &str,
        video_url: &str,
    ) -> anyhow::Result<UpstreamReply<VideoEditResponse>> {
        let body = VideoEditPayload {
            model: &self.video_model,
            prompt,
            video_url,
        };

        let resp = self
            .client
            .post(self.url("videos/edits"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("videos/edits request failed")?;

        read_reply(resp, "videos/edits").await
    }

    async fn video_status(&self, request_id: &str) -> anyhow::Result<UpstreamReply<VideoProgress>> {
        let resp = self
            .client
            .get(self.status_url(request_id)?)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("videos status request failed")?;

        // 202 is a success status, but for a status query it means "not yet".
        if resp.status() == StatusCode::ACCEPTED {
            debug!(request_id, "upstream: video still processing");
            return Ok(UpstreamReply::Ready(VideoProgress::Pending));
        }

        Ok(match read_reply::<VideoStatusResponse>(resp, "videos/{id}").await? {
            UpstreamReply::Ready(status) => UpstreamReply::Ready(VideoProgress::Done(status)),
            UpstreamReply::Failed { status, message } => UpstreamReply::Failed { status, message },
        })
    }

    fn info(&self) -> ProviderInfo {
        ProviderInfo {
            name: "xai".to_string(),
            base_url: self.base_url.clone(),
        }
    }
}

async fn read_reply<T: DeserializeOwned>(
    resp: reqwest::Response,
    endpoint: &'static str,
) -> anyhow::Result<UpstreamReply<T>> {
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("{endpoint}: failed to read upstream body"))?;

    if status.is_success() {
        let body = serde_json::from_slice(&bytes)
            .with_context(|| format!("{endpoint}: undecodable upstream body (HTTP {status})"))?;
        return Ok(UpstreamReply::Ready(body));
    }

    warn!(
        endpoint,
        status = status.as_u16(),
        body = %String::from_utf8_lossy(&bytes),
        "xAI API error"
    );

    Ok(UpstreamReply::Failed {
        status: status.as_u16(),
        message: UpstreamErrorBody::message_from(&bytes),
    })
}
