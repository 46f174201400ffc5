use axum::{extract::State, Json};
use edit_protocol::{EditImageRequest, EditImageResponse};
use tracing::info;

use crate::error::{present, ContractViolation, JsonBody, ProxyError};
use crate::provider::UpstreamReply;
use crate::state::SharedState;

pub const FIELDS_REQUIRED: &str = "Prompt and image are required";
pub const EDIT_FAILED: &str = "Failed to edit image";

/// `POST /api/edit-image`: one upstream call, no intermediate state.
pub async fn edit_image(
    State(state): State<SharedState>,
    JsonBody(req): JsonBody<EditImageRequest>,
) -> Result<Json<EditImageResponse>, ProxyError> {
    let (Some(prompt), Some(image)) = (present(req.prompt), present(req.image)) else {
        return Err(ProxyError::Validation(FIELDS_REQUIRED));
    };

    let media = state.media()?;

    match media.edit_image(&prompt, &image).await? {
        UpstreamReply::Ready(body) => {
            let url = body
                .first_url()
                .ok_or(ProxyError::Contract(ContractViolation::NoEditedImage))?;
            info!("image edit completed");
            Ok(Json(EditImageResponse { url: url.to_string() }))
        }
        UpstreamReply::Failed { status, message } => {
            Err(ProxyError::upstream(status, message, EDIT_FAILED))
        }
    }
}
