//! Status queries and the polling state machine.

use crate::config::PollConfig;
use crate::error::{Error, Result};
use crate::types::{DocId, Event, TaskId, TaskStatus};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::DocTaskClient;
use super::response::{self, TaskStatusData};

/// Status endpoint path
const TASK_ENDPOINT: &str = "task";

/// Query parameter carrying the task identifier
const TASK_ID_PARAM: &str = "taskId";

/// Where a polled task stands after a status query
///
/// `Running` is the only non-terminal state. A "task is running" error from
/// the service keeps the task in `Running` with the last known percentage.
#[derive(Debug)]
pub enum PollState {
    /// Not finished yet
    Running {
        /// Last reported completion percentage, if any reading succeeded
        percentage: Option<u8>,
    },
    /// Finished; the artifact can be downloaded
    Complete(DocId),
    /// The query failed with a non-transient error
    Failed(Error),
}

impl PollState {
    /// Transition for the outcome of one status query
    pub fn after_query(outcome: Result<TaskStatus>, previous: Option<u8>) -> Self {
        match outcome {
            Ok(TaskStatus {
                doc_id: Some(doc_id),
                ..
            }) => PollState::Complete(doc_id),
            Ok(status) => PollState::Running {
                percentage: Some(status.percentage),
            },
            Err(e) if e.is_task_running() => PollState::Running {
                percentage: previous,
            },
            Err(e) => PollState::Failed(e),
        }
    }

    /// Whether polling stops in this state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Running { .. })
    }
}

impl DocTaskClient {
    /// Issue one signed status query
    pub async fn query_status(&self, task_id: &TaskId) -> Result<TaskStatus> {
        if task_id.as_str().is_empty() {
            return Err(Error::validation("cannot query status of an empty task id"));
        }

        let mut params = self.signing_params();
        params.insert(TASK_ID_PARAM, task_id.as_str());

        let url = self.endpoint_url(TASK_ENDPOINT)?;
        let response = self
            .http
            .get(url)
            .query(&self.signed_query(&params))
            .send()
            .await?;

        let data = response::read_envelope(TASK_ENDPOINT, response).await?;
        let status = response::decode_data::<TaskStatusData>(TASK_ENDPOINT, data)?
            .into_status(TASK_ENDPOINT)?;

        tracing::debug!(
            task_id = %task_id,
            percentage = status.percentage,
            "Task status received"
        );
        Ok(status)
    }

    /// Poll until the task completes, using the configured poll settings
    ///
    /// With the default configuration this polls every 2000 ms for as long as
    /// the task keeps running.
    pub async fn poll_until_complete(&self, task_id: &TaskId) -> Result<DocId> {
        self.poll_until_complete_with(task_id, &self.config.poll, &CancellationToken::new())
            .await
    }

    /// Poll until the task completes
    ///
    /// Queries are sequential and spaced by `poll.interval`. Only the service's
    /// "task is running" error is retried; any other error ends polling
    /// immediately. `poll.max_attempts` and `poll.timeout` bound the loop when
    /// set, and `cancel` interrupts it while it waits between queries.
    pub async fn poll_until_complete_with(
        &self,
        task_id: &TaskId,
        poll: &PollConfig,
        cancel: &CancellationToken,
    ) -> Result<DocId> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_percentage: Option<u8> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled {
                    task_id: task_id.clone(),
                });
            }
            if let Some(timeout) = poll.timeout {
                let elapsed = started.elapsed();
                if attempts > 0 && elapsed >= timeout {
                    return Err(Error::PollTimeout {
                        task_id: task_id.clone(),
                        elapsed,
                    });
                }
            }

            attempts = attempts.saturating_add(1);
            let outcome = self.query_status(task_id).await;

            match &outcome {
                Ok(status) => self.emit(Event::TaskProgress {
                    task_id: task_id.clone(),
                    percentage: status.percentage,
                }),
                Err(e) if e.is_task_running() => {
                    tracing::warn!(
                        task_id = %task_id,
                        attempt = attempts,
                        "Task is still running, retrying"
                    );
                    self.emit(Event::TaskRunning {
                        task_id: task_id.clone(),
                        retry_in_ms: u64::try_from(poll.interval.as_millis()).unwrap_or(u64::MAX),
                    });
                }
                Err(_) => {}
            }

            match PollState::after_query(outcome, last_percentage) {
                PollState::Complete(doc_id) => {
                    tracing::info!(
                        task_id = %task_id,
                        doc_id = %doc_id,
                        attempts,
                        "Task complete"
                    );
                    self.emit(Event::TaskComplete {
                        task_id: task_id.clone(),
                        doc_id: doc_id.clone(),
                    });
                    return Ok(doc_id);
                }
                PollState::Failed(e) => return Err(e),
                PollState::Running { percentage } => last_percentage = percentage,
            }

            if poll.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(Error::PollLimitExceeded {
                    task_id: task_id.clone(),
                    attempts,
                });
            }

            let delay = match poll.timeout {
                Some(timeout) => poll
                    .interval
                    .min(timeout.saturating_sub(started.elapsed()))
                    .max(Duration::from_millis(1)),
                None => poll.interval,
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(task_id = %task_id, "Polling cancelled");
                    return Err(Error::Cancelled { task_id: task_id.clone() });
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
