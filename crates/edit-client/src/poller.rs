//! Drives a submitted video edit to a terminal state.
//!
//! One status query per attempt, a constant delay between attempts, and
//! a fixed attempt budget. Transient query failures consume an attempt
//! like any other, so the worst case is bounded by
//! `interval * max_attempts` plus the per-request timeout.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::StatusReply;
use crate::error::PollError;
use crate::job::{Job, JobHandle, VideoResult};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two status queries.
    pub interval: Duration,
    /// Total number of status queries, including the first.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where status replies come from. `Err` is a transient failure.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn query_status(&self, job: &JobHandle) -> anyhow::Result<StatusReply>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct JobPoller<S, Z = TokioSleeper> {
    source: S,
    sleeper: Z,
    policy: PollPolicy,
}

impl<S: StatusSource> JobPoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sleeper: TokioSleeper,
            policy: PollPolicy::default(),
        }
    }
}

impl<S: StatusSource, Z: Sleeper> JobPoller<S, Z> {
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper<Z2: Sleeper>(self, sleeper: Z2) -> JobPoller<S, Z2> {
        JobPoller {
            source: self.source,
            sleeper,
            policy: self.policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Polls until the job completes, fails, runs out of attempts, or
    /// `cancel` fires. Cancellation is honoured during a wait and during
    /// an in-flight query.
    pub async fn run(
        &self,
        handle: &JobHandle,
        cancel: &CancellationToken,
    ) -> Result<VideoResult, PollError> {
        let mut job = Job::submitted(handle.clone());
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            let queried = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(cancelled(&job)),
                r = self.source.query_status(handle) => r,
            };

            match queried {
                Ok(reply) => {
                    job.observe(reply)?;
                    match job.outcome() {
                        Some(Ok(result)) => {
                            info!(job_id = %handle, attempt, "video edit completed");
                            return Ok(result.clone());
                        }
                        Some(Err(message)) => {
                            info!(job_id = %handle, attempt, error = %message, "video edit failed");
                            return Err(PollError::Failed(message.to_string()));
                        }
                        None => debug!(job_id = %handle, attempt, max_attempts, "video edit processing"),
                    }
                }
                Err(e) if attempt == max_attempts => {
                    warn!(job_id = %handle, attempt, "status query failed on final attempt: {e:#}");
                    return Err(PollError::Transient { attempts: attempt, source: e });
                }
                Err(e) => {
                    warn!(job_id = %handle, attempt, max_attempts, "status query failed, retrying: {e:#}");
                }
            }

            if attempt < max_attempts {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(cancelled(&job)),
                    _ = self.sleeper.sleep(self.policy.interval) => {}
                }
            }
        }

        warn!(job_id = %handle, attempts = max_attempts, "video edit timed out");
        Err(PollError::Timeout { attempts: max_attempts })
    }
}

fn cancelled(job: &Job) -> PollError {
    info!(job_id = %job.id(), state = ?job.state(), "video edit polling cancelled");
    PollError::Cancelled
}
