//! Request and response schemas of the upstream media API.
//!
//! Every field the upstream may omit is an `Option`; the accessors
//! below are the only place "present but empty" is folded into absent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ImageEditPayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub image: ImageRef<'a>,
}

#[derive(Debug, Serialize)]
pub struct ImageRef<'a> {
    pub url: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<'a> ImageRef<'a> {
    pub fn url(url: &'a str) -> Self {
        Self { url, kind: "image_url" }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoEditPayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub video_url: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageEditResponse {
    #[serde(default)]
    pub data: Option<Vec<ImageDatum>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageDatum {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageEditResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .first()?
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoEditResponse {
    #[serde(default)]
    pub id: Option<String>,
}

impl VideoEditResponse {
    pub fn request_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStatusResponse {
    #[serde(default)]
    pub video: Option<VideoOutput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoOutput {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVideo {
    pub url: String,
    pub duration: Option<f64>,
}

impl VideoStatusResponse {
    pub fn resolved(&self) -> Option<ResolvedVideo> {
        let video = self.video.as_ref()?;
        let url = video.url.as_deref().filter(|u| !u.is_empty())?;
        Some(ResolvedVideo {
            url: url.to_string(),
            duration: video.duration,
        })
    }
}

/// Outcome of a status query that the upstream answered successfully.
#[derive(Debug, Clone)]
pub enum VideoProgress {
    /// Upstream answered 202; the job is still running.
    Pending,
    Done(VideoStatusResponse),
}

/// `{ "error": { "message": "..." } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpstreamErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl UpstreamErrorBody {
    /// Best-effort extraction of the upstream message from a raw body.
    pub fn message_from(bytes: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(bytes)
            .ok()?
            .error?
            .message
            .filter(|m| !m.is_empty())
    }
}
