pub const EDIT_IMAGE_PATH: &str = "/api/edit-image";

/// `POST` submits a video edit, `GET ?request_id=` queries its status.
pub const EDIT_VIDEO_PATH: &str = "/api/edit-video";

pub const HEALTH_PATH: &str = "/health";

pub const REQUEST_ID_PARAM: &str = "request_id";
