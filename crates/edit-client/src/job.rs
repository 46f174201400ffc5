use std::fmt;

use thiserror::Error;

use crate::client::StatusReply;

/// Opaque id the upstream assigned to a video edit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoResult {
    pub url: String,
    pub duration: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("job {id} is already {state:?}; no further observations are accepted")]
    Terminal { id: JobHandle, state: JobState },
}

/// An in-flight video edit as seen by the client.
///
/// State only moves forward: Submitted, Processing, then Completed or
/// Failed. `result` is set only when Completed, `error` only when Failed.
#[derive(Clone, Debug)]
pub struct Job {
    id: JobHandle,
    state: JobState,
    result: Option<VideoResult>,
    error: Option<String>,
}

impl Job {
    pub fn submitted(id: JobHandle) -> Self {
        Self {
            id,
            state: JobState::Submitted,
            result: None,
            error: None,
        }
    }

    pub fn id(&self) -> &JobHandle {
        &self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn result(&self) -> Option<&VideoResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies one status reply and returns the new state.
    pub fn observe(&mut self, reply: StatusReply) -> Result<JobState, TransitionError> {
        if self.state.is_terminal() {
            return Err(TransitionError::Terminal {
                id: self.id.clone(),
                state: self.state,
            });
        }

        match reply {
            StatusReply::Processing => self.state = JobState::Processing,
            StatusReply::Completed(result) => {
                self.state = JobState::Completed;
                self.result = Some(result);
            }
            StatusReply::Failed(message) => {
                self.state = JobState::Failed;
                self.error = Some(message);
            }
        }
        Ok(self.state)
    }

    /// `Some` once terminal: the result when Completed, the error when Failed.
    pub fn outcome(&self) -> Option<Result<&VideoResult, &str>> {
        match self.state {
            JobState::Completed => self.result.as_ref().map(Ok),
            JobState::Failed => Some(Err(self.error.as_deref().unwrap_or_default())),
            JobState::Submitted | JobState::Processing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done() -> StatusReply {
        StatusReply::Completed(VideoResult {
            url: "https://x/out.mp4".to_string(),
            duration: Some(5.2),
        })
    }

    #[test]
    fn starts_submitted_without_outcome() {
        let job = Job::submitted(JobHandle::new("job123"));
        assert_eq!(job.state(), JobState::Submitted);
        assert!(job.outcome().is_none());
        assert!(job.result().is_none());
        assert!(job.error().is_none());
    }

    #[test]
    fn processing_loops_then_completes() {
        let mut job = Job::submitted(JobHandle::new("job123"));
        assert_eq!(job.observe(StatusReply::Processing), Ok(JobState::Processing));
        assert_eq!(job.observe(StatusReply::Processing), Ok(JobState::Processing));
        assert_eq!(job.observe(done()), Ok(JobState::Completed));

        let result = job.outcome().unwrap().unwrap();
        assert_eq!(result.url, "https://x/out.mp4");
        assert_eq!(result.duration, Some(5.2));
        assert!(job.error().is_none());
    }

    #[test]
    fn failure_captures_message() {
        let mut job = Job::submitted(JobHandle::new("job123"));
        job.observe(StatusReply::Processing).unwrap();
        assert_eq!(
            job.observe(StatusReply::Failed("content policy".to_string())),
            Ok(JobState::Failed)
        );
        assert_eq!(job.outcome(), Some(Err("content policy")));
        assert!(job.result().is_none());
    }

    #[test]
    fn may_complete_on_first_observation() {
        let mut job = Job::submitted(JobHandle::new("fast"));
        assert_eq!(job.observe(done()), Ok(JobState::Completed));
    }

    #[test]
    fn terminal_jobs_reject_further_observations() {
        let mut job = Job::submitted(JobHandle::new("job123"));
        job.observe(done()).unwrap();

        let err = job.observe(StatusReply::Processing).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Terminal {
                id: JobHandle::new("job123"),
                state: JobState::Completed
            }
        );
        assert_eq!(job.state(), JobState::Completed);

        let mut job = Job::submitted(JobHandle::new("job456"));
        job.observe(StatusReply::Failed("boom".to_string())).unwrap();
        assert!(job.observe(done()).is_err());
        assert_eq!(job.state(), JobState::Failed);
        assert!(job.result().is_none());
    }
}
