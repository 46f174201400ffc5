use std::any::Any;
use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use edit_protocol::ErrorBody;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

pub const INTERNAL_MESSAGE: &str = "Internal server error";
pub const MISSING_KEY_MESSAGE: &str = "XAI_API_KEY is not configured";

/// The upstream answered successfully but left out the field we need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractViolation {
    NoEditedImage,
    NoRequestId,
    NoVideoUrl,
}

impl ContractViolation {
    pub fn message(self) -> &'static str {
        match self {
            ContractViolation::NoEditedImage => "No edited image returned from API",
            ContractViolation::NoRequestId => "No request ID returned from API",
            ContractViolation::NoVideoUrl => "No video URL returned from API",
        }
    }
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("{}", MISSING_KEY_MESSAGE)]
    Configuration,

    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    Contract(ContractViolation),

    #[error("internal fault: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ProxyError {
    /// Relays an upstream failure, falling back to `fallback` when the
    /// upstream gave no readable message.
    pub fn upstream(status: u16, message: Option<String>, fallback: &str) -> Self {
        ProxyError::Upstream {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message: message.unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Configuration | ProxyError::Contract(_) | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ProxyError::Internal(e) => {
                error!(error = %format!("{e:#}"), "API route error");
                INTERNAL_MESSAGE.to_string()
            }
            ProxyError::Configuration => {
                error!("edit request refused: {MISSING_KEY_MESSAGE}");
                self.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Turns a handler panic into the same generic 500 as any other internal fault.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    ProxyError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

/// A required field counts as present only when it holds non-blank text.
pub(crate) fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

/// JSON body extractor that ignores `Content-Type` and turns an
/// unreadable body into an internal fault instead of axum's rejection.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| anyhow::anyhow!("failed to read request body: {e}"))?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("invalid JSON request body: {e}"))?;
        Ok(JsonBody(value))
    }
}

/// Query-string extractor that never rejects.
///
/// A repeated key keeps its first value, and a query string that cannot be
/// read at all yields `T::default()`, so the handler's own validation
/// decides the response.
pub struct FirstValueQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for FirstValueQuery<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Query::<Vec<(String, String)>>::from_request_parts(parts, state).await {
            Ok(Query(pairs)) => pairs,
            Err(e) => {
                debug!("unreadable query string: {e}");
                Vec::new()
            }
        };

        let mut first = Map::new();
        for (key, value) in pairs {
            first.entry(key).or_insert(Value::String(value));
        }
        Ok(FirstValueQuery(
            serde_json::from_value(Value::Object(first)).unwrap_or_default(),
        ))
    }
}
