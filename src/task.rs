//! Task result metadata stored by the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for tasks
pub type TaskId = Uuid;

/// Task state as recorded in the result store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    /// Unknown to the backend, or waiting to be processed
    Pending,
    /// Picked up by a worker
    Started,
    /// Failed and scheduled for another run
    Retry,
    /// Completed successfully
    Success,
    /// Failed for good
    Failure,
    /// Cancelled before completion
    Revoked,
}

impl TaskStatus {
    /// Whether no further state change is expected
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Failure | TaskStatus::Revoked
        )
    }
}

/// Stored record of a task outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMeta {
    pub task_id: TaskId,
    pub status: TaskStatus,
    /// Return value on success, error payload on failure
    pub result: serde_json::Value,
    /// Formatted error or backtrace for failed tasks
    pub traceback: Option<String>,
    /// When the task reached a ready state
    pub date_done: Option<DateTime<Utc>>,
}

impl TaskMeta {
    /// Metadata for a task the backend holds no record of
    pub fn pending(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            result: serde_json::Value::Null,
            traceback: None,
            date_done: None,
        }
    }

    /// Build metadata for a state change; ready states get a completion time
    pub fn new(
        task_id: TaskId,
        status: TaskStatus,
        result: serde_json::Value,
        traceback: Option<String>,
    ) -> Self {
        Self {
            task_id,
            status,
            result,
            traceback,
            date_done: status.is_ready().then(Utc::now),
        }
    }
}
