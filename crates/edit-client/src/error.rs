use thiserror::Error;

use crate::job::TransitionError;

/// Failure of a single submission or status request.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid edit service URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The proxy answered with a non-success status; `message` is its `error` field.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Accepted, yet the proxy did not hand back a job id.
    #[error("No request ID returned")]
    MissingJobId,

    #[error("Failed to reach the edit service")]
    Unreachable(#[source] reqwest::Error),

    #[error("Unexpected response from the edit service (HTTP {status})")]
    Malformed { status: u16 },
}

/// Why a poll loop ended without a video.
#[derive(Debug, Error)]
pub enum PollError {
    /// The job reached Failed; carries the proxy's message.
    #[error("{0}")]
    Failed(String),

    #[error("video editing timeout")]
    Timeout { attempts: u32 },

    /// The final allowed status query itself failed.
    #[error("{source:#}")]
    Transient {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("video editing cancelled")]
    Cancelled,

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
