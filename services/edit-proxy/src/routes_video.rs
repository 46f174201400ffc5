use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use edit_protocol::{EditVideoRequest, VideoAccepted, VideoStatusBody, VideoStatusQuery};
use tracing::info;

use crate::error::{present, ContractViolation, FirstValueQuery, JsonBody, ProxyError};
use crate::provider::UpstreamReply;
use crate::state::SharedState;
use crate::types::VideoProgress;

pub const FIELDS_REQUIRED: &str = "Prompt and videoUrl are required";
pub const REQUEST_ID_REQUIRED: &str = "request_id is required";
pub const REQUEST_ID_INVALID: &str = "request_id is invalid";
pub const EDIT_FAILED: &str = "Failed to edit video";
pub const STATUS_FAILED: &str = "Failed to get video result";

/// `POST /api/edit-video`: hands the job to the upstream and returns its id.
pub async fn submit_video_edit(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<EditVideoRequest>,
) -> Result<(StatusCode, Json<VideoAccepted>), ProxyError> {
    let (Some(prompt), Some(video_url)) = (present(req.prompt), present(req.video_url)) else {
        return Err(ProxyError::Validation(FIELDS_REQUIRED));
    };

    let media = state.media()?;

    match media.edit_video(&prompt, &video_url).await? {
        UpstreamReply::Ready(body) => {
            let request_id = body
                .request_id()
                .ok_or(ProxyError::Contract(ContractViolation::NoRequestId))?;
            info!(upstream_request_id = %request_id, "video edit accepted");
            Ok((
                StatusCode::ACCEPTED,
                Json(VideoAccepted { request_id: request_id.to_string() }),
            ))
        }
        UpstreamReply::Failed { status, message } => {
            Err(ProxyError::upstream(status, message, EDIT_FAILED))
        }
    }
}

/// `GET /api/edit-video?request_id=..`: one status lookup, no waiting.
pub async fn video_status(
    State(state): State<SharedState>,
    FirstValueQuery(query): FirstValueQuery<VideoStatusQuery>,
) -> Result<(StatusCode, Json<VideoStatusBody>), ProxyError> {
    let Some(request_id) = present(query.request_id) else {
        return Err(ProxyError::Validation(REQUEST_ID_REQUIRED));
    };
    // A dot segment would resolve to a different upstream path.
    if matches!(request_id.as_str(), "." | "..") {
        return Err(ProxyError::Validation(REQUEST_ID_INVALID));
    }

    let media = state.media()?;

    match media.video_status(&request_id).await? {
        UpstreamReply::Ready(VideoProgress::Pending) => {
            Ok((StatusCode::ACCEPTED, Json(VideoStatusBody::Processing)))
        }
        UpstreamReply::Ready(VideoProgress::Done(body)) => {
            let video = body
                .resolved()
                .ok_or(ProxyError::Contract(ContractViolation::NoVideoUrl))?;
            info!(upstream_request_id = %request_id, "video edit completed");
            Ok((
                StatusCode::OK,
                Json(VideoStatusBody::Completed {
                    url: video.url,
                    duration: video.duration,
                }),
            ))
        }
        UpstreamReply::Failed { status, message } => {
            Err(ProxyError::upstream(status, message, STATUS_FAILED))
        }
    }
}
