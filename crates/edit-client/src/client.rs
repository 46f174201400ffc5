use std::time::Duration;

use async_trait::async_trait;
use edit_protocol::{
    EditImageRequest, EditImageResponse, EditVideoRequest, ErrorBody, VideoStatusBody,
    EDIT_IMAGE_PATH, EDIT_VIDEO_PATH, REQUEST_ID_PARAM,
};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::data_url::is_media_reference;
use crate::error::ClientError;
use crate::job::{JobHandle, VideoResult};
use crate::poller::StatusSource;

/// Applied to every request so one stalled call cannot hang a poll loop.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const IMAGE_FAILED: &str = "Failed to edit image";
const VIDEO_FAILED: &str = "Failed to edit video";
const STATUS_FAILED: &str = "Failed to get video status";

#[derive(Clone, Debug, PartialEq)]
pub struct EditResult {
    pub output_image_url: String,
}

/// One answer from the status endpoint that was not a transport failure.
#[derive(Clone, Debug, PartialEq)]
pub enum StatusReply {
    Processing,
    Completed(VideoResult),
    Failed(String),
}

#[derive(Deserialize)]
struct AcceptedBody {
    #[serde(default)]
    request_id: Option<String>,
}

/// HTTP client for the edit proxy.
#[derive(Clone, Debug)]
pub struct EditClient {
    base: Url,
    http: reqwest::Client,
}

impl EditClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(format!(
                "unsupported scheme {:?}",
                base.scheme()
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url
    }

    /// One request, one response. `source_image` is a URL or a `data:` URL.
    pub async fn submit_image_edit(
        &self,
        prompt: &str,
        source_image: &str,
    ) -> Result<EditResult, ClientError> {
        let prompt = required(prompt, "Please enter a prompt")?;
        let image = media(source_image, "Please upload an image")?;

        let resp = self
            .http
            .post(self.endpoint(EDIT_IMAGE_PATH))
            .json(&EditImageRequest::new(prompt, image))
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let (status, bytes) = read(resp).await?;

        if !status.is_success() {
            return Err(rejected(status, &bytes, IMAGE_FAILED));
        }
        let body: EditImageResponse = serde_json::from_slice(&bytes)
            .map_err(|_| ClientError::Malformed { status: status.as_u16() })?;

        info!("image edit returned");
        Ok(EditResult { output_image_url: body.url })
    }

    /// Submits a video edit and returns the job id to poll.
    pub async fn submit_video_edit(
        &self,
        prompt: &str,
        source_video_url: &str,
    ) -> Result<JobHandle, ClientError> {
        let prompt = required(prompt, "Please enter a prompt")?;
        let video_url = media(source_video_url, "Please upload a video")?;

        let resp = self
            .http
            .post(self.endpoint(EDIT_VIDEO_PATH))
            .json(&EditVideoRequest::new(prompt, video_url))
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let (status, bytes) = read(resp).await?;

        if !status.is_success() {
            return Err(rejected(status, &bytes, VIDEO_FAILED));
        }
        let body: AcceptedBody = serde_json::from_slice(&bytes)
            .map_err(|_| ClientError::Malformed { status: status.as_u16() })?;

        let id = body
            .request_id
            .filter(|id| !id.is_empty())
            .ok_or(ClientError::MissingJobId)?;
        info!(job_id = %id, "video edit accepted");
        Ok(JobHandle::new(id))
    }

    /// One status lookup.
    ///
    /// `Err` means the query itself failed (transport, undecodable body)
    /// and is worth retrying; an explicit failure from the proxy is
    /// `Ok(StatusReply::Failed)`.
    pub async fn query_video_status(&self, job: &JobHandle) -> Result<StatusReply, ClientError> {
        let mut url = self.endpoint(EDIT_VIDEO_PATH);
        url.query_pairs_mut().append_pair(REQUEST_ID_PARAM, job.as_str());

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        let (status, bytes) = read(resp).await?;

        if status == StatusCode::ACCEPTED {
            return Ok(StatusReply::Processing);
        }
        if !status.is_success() {
            let message = error_message(&bytes).unwrap_or_else(|| STATUS_FAILED.to_string());
            debug!(job_id = %job, status = status.as_u16(), "status query reported failure");
            return Ok(StatusReply::Failed(message));
        }

        match serde_json::from_slice::<VideoStatusBody>(&bytes) {
            Ok(VideoStatusBody::Processing) => Ok(StatusReply::Processing),
            Ok(VideoStatusBody::Completed { url, duration }) => {
                Ok(StatusReply::Completed(VideoResult { url, duration }))
            }
            Err(_) => Err(ClientError::Malformed { status: status.as_u16() }),
        }
    }
}

#[async_trait]
impl StatusSource for EditClient {
    async fn query_status(&self, job: &JobHandle) -> anyhow::Result<StatusReply> {
        Ok(self.query_video_status(job).await?)
    }
}

fn required<'a>(value: &'a str, message: &'static str) -> Result<&'a str, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(message));
    }
    Ok(trimmed)
}

fn media<'a>(value: &'a str, message: &'static str) -> Result<&'a str, ClientError> {
    let value = required(value, message)?;
    if !is_media_reference(value) {
        return Err(ClientError::Validation(message));
    }
    Ok(value)
}

async fn read(resp: reqwest::Response) -> Result<(StatusCode, Vec<u8>), ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await.map_err(ClientError::Unreachable)?;
    Ok((status, bytes.to_vec()))
}

fn error_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.is_empty())
}

fn rejected(status: StatusCode, bytes: &[u8], fallback: &str) -> ClientError {
    ClientError::Rejected {
        status: status.as_u16(),
        message: error_message(bytes).unwrap_or_else(|| fallback.to_string()),
    }
}
