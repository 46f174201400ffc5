//! Submission client and job poller for the edit proxy.
//!
//! Image edits are one request and one response. Video edits return a
//! [`JobHandle`] that a [`JobPoller`] drives to a terminal state.

pub mod client;
pub mod data_url;
pub mod error;
pub mod job;
pub mod poller;

pub use client::{EditClient, EditResult, StatusReply, DEFAULT_REQUEST_TIMEOUT};
pub use data_url::DataUrlError;
pub use error::{ClientError, PollError};
pub use job::{Job, JobHandle, JobState, TransitionError, VideoResult};
pub use poller::{JobPoller, PollPolicy, Sleeper, StatusSource, TokioSleeper};
pub use tokio_util::sync::CancellationToken;
