use serde::{Deserialize, Serialize};

/// Body of `POST /api/edit-image`.
///
/// Fields are optional on the wire so the proxy can answer a missing
/// field with its own 400 instead of a deserializer rejection.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EditImageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Image URL or inline `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl EditImageRequest {
    pub fn new(prompt: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            image: Some(image.into()),
        }
    }
}

/// Body of `POST /api/edit-video`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct EditVideoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(
        rename = "videoUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub video_url: Option<String>,
}

impl EditVideoRequest {
    pub fn new(prompt: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            video_url: Some(video_url.into()),
        }
    }
}

/// Query string of `GET /api/edit-video`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VideoStatusQuery {
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EditImageResponse {
    pub url: String,
}

/// 202 body returned once the upstream accepted a video edit.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VideoAccepted {
    pub request_id: String,
}

/// Body of a status query that did not fail.
///
/// `202 {"status":"processing"}` or
/// `200 {"status":"completed","url":..,"duration":..}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum VideoStatusBody {
    Processing,
    Completed {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<f64>,
    },
}

/// Every non-success response carries this shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
