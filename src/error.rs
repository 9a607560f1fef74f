//! Error types for doctask
//!
//! This module provides the error taxonomy for the task lifecycle client:
//! - Transport failures (connection, timeout, body read)
//! - API failures reported by the service (non-2xx status or non-zero result code)
//! - Local validation failures (unreadable input, malformed response shape)
//! - Polling terminations (attempt ceiling, timeout budget, cancellation)
//!
//! Errors never terminate the process. Only the outermost caller decides the
//! process outcome, using [`Error::exit_code`].

use std::time::Duration;
use thiserror::Error;

use crate::types::TaskId;

/// Result type alias for doctask operations
pub type Result<T> = std::result::Result<T, Error>;

/// Substring of the error detail that the service uses to report a task that
/// has not finished yet. It is the only error the poller retries.
pub const TASK_RUNNING_DETAIL: &str = "The task is running";

/// Main error type for doctask
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, timeout or body-read failure in the HTTP transport
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered, but reported a failure
    #[error("API error on {endpoint} (HTTP {status}{}): {message}", code_suffix(.code))]
    Api {
        /// Endpoint path the request was sent to (e.g., "task")
        endpoint: String,
        /// HTTP status code of the response
        status: u16,
        /// Result code from the response envelope, if the body could be decoded
        code: Option<i64>,
        /// Human-readable message from the service
        message: String,
        /// `data.detail` from the error envelope, if present
        detail: Option<String>,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Local precondition failure or a response that does not match the expected shape
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O error while writing the artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// Polling stopped after the configured number of status queries
    #[error("task {task_id} did not complete within {attempts} status queries")]
    PollLimitExceeded {
        /// Task that was being polled
        task_id: TaskId,
        /// Number of status queries issued
        attempts: u32,
    },

    /// Polling stopped after the configured time budget
    #[error("task {task_id} did not complete within {elapsed:?}")]
    PollTimeout {
        /// Task that was being polled
        task_id: TaskId,
        /// Time spent polling
        elapsed: Duration,
    },

    /// Polling was cancelled by the caller
    #[error("polling for task {task_id} was cancelled")]
    Cancelled {
        /// Task that was being polled
        task_id: TaskId,
    },
}

fn code_suffix(code: &Option<i64>) -> String {
    match code {
        Some(code) => format!(", code {}", code),
        None => String::new(),
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`]
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Whether this is the service's "task is running" condition
    ///
    /// This is the only error the poller treats as transient.
    pub fn is_task_running(&self) -> bool {
        matches!(
            self,
            Error::Api { detail: Some(detail), .. } if detail.contains(TASK_RUNNING_DETAIL)
        )
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport_error",
            Error::Api { .. } => "api_error",
            Error::Validation(_) => "validation_error",
            Error::Io(_) => "io_error",
            Error::Config { .. } => "config_error",
            Error::PollLimitExceeded { .. } => "poll_limit_exceeded",
            Error::PollTimeout { .. } => "poll_timeout",
            Error::Cancelled { .. } => "cancelled",
        }
    }

    /// Process exit code for callers that turn a failed workflow into a process outcome
    ///
    /// Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::Config { .. } => 2,
            Error::Transport(_) => 3,
            Error::Api { .. } => 4,
            Error::Io(_) => 5,
            Error::PollLimitExceeded { .. } | Error::PollTimeout { .. } | Error::Cancelled { .. } => {
                6
            }
        }
    }
}
