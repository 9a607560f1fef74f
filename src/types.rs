//! Core types for doctask

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifier of a server-side task, returned by submission
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new TaskId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a finished artifact
///
/// Only a completed [`TaskStatus`] produces one, and a download consumes it by value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Create a new DocId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DocId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<&str> for DocId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress of a task as reported by one status query
///
/// `doc_id` is always present when `percentage == 100`; the response decoder
/// rejects anything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskStatus {
    /// Completion percentage (0 to 100)
    pub percentage: u8,
    /// Artifact handle, populated once the task is complete
    pub doc_id: Option<DocId>,
}

impl TaskStatus {
    /// Whether the task has reached full completion
    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

/// An artifact written to disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Path the artifact was written to (may differ from the requested path on collision)
    pub path: PathBuf,
    /// Number of bytes written
    pub bytes: u64,
}

/// Result of a successful workflow run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowOutcome {
    /// Task created by the submission
    pub task_id: TaskId,
    /// Artifact that was downloaded
    pub doc_id: DocId,
    /// Path the artifact was written to
    pub output_path: PathBuf,
    /// Number of bytes written
    pub bytes_written: u64,
}

/// Event emitted by the client during a workflow
///
/// Subscribe with [`DocTaskClient::subscribe`](crate::DocTaskClient::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A task was created on the service
    TaskSubmitted {
        /// Endpoint the task was submitted to
        endpoint: String,
        /// Task ID
        task_id: TaskId,
    },

    /// A status query succeeded
    TaskProgress {
        /// Task ID
        task_id: TaskId,
        /// Completion percentage (0 to 100)
        percentage: u8,
    },

    /// The service reported that the task is still running; polling will retry
    TaskRunning {
        /// Task ID
        task_id: TaskId,
        /// Delay before the next query in milliseconds
        retry_in_ms: u64,
    },

    /// The task reached 100%
    TaskComplete {
        /// Task ID
        task_id: TaskId,
        /// Artifact handle
        doc_id: DocId,
    },

    /// The artifact was written to disk
    Downloaded {
        /// Artifact handle
        doc_id: DocId,
        /// Final path
        path: PathBuf,
        /// Number of bytes written
        bytes: u64,
    },

    /// A workflow run finished successfully
    WorkflowComplete {
        /// Final output path
        output_path: PathBuf,
    },

    /// A workflow run failed
    WorkflowFailed {
        /// Machine-readable error code
        code: String,
        /// Error message
        error: String,
    },
}
