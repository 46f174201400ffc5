//! Local media files as inline `data:` URLs, the form the proxy accepts
//! in place of a hosted image or video URL.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media type for {}", .0.display())]
    UnknownType(PathBuf),
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(mime)
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

pub fn is_video_mime(mime: &str) -> bool {
    mime.starts_with("video/")
}

/// True for anything the proxy can forward as-is: a hosted URL or a data URL.
pub fn is_media_reference(input: &str) -> bool {
    ["http://", "https://", "data:"]
        .iter()
        .any(|prefix| input.starts_with(prefix))
}

pub fn encode_bytes(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads `path` and returns it as a data URL together with its mime type.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<(String, &'static str), DataUrlError> {
    let path = path.as_ref();
    let mime = mime_for_path(path).ok_or_else(|| DataUrlError::UnknownType(path.to_path_buf()))?;
    let bytes = tokio::fs::read(path).await.map_err(|source| DataUrlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((encode_bytes(mime, &bytes), mime))
}
