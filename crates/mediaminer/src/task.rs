//! # File tasks
//!
//! One [`FileTask`] per queued file. Its completion handle is consumed when
//! the outcome is reported, so a task reports exactly once.

use std::fmt;

use mediaminer_core::{ExternalId, GuessedIdentity, MetadataRecord, MinerError, UpdateBatch};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

/// Pipeline stage a task is in, or failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Guessing,
    Resolving,
    Fetching,
    Extracting,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Guessing => "guessing",
            Self::Resolving => "resolving",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

/// Successful outcome of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    pub urn: String,
    pub uri: String,
    pub identity: GuessedIdentity,
    pub id: ExternalId,
    pub record: MetadataRecord,
    /// The batch handed to the output sink.
    pub batch: UpdateBatch,
}

/// Failed outcome of a task, with enough context to log it.
#[derive(Debug, Error)]
#[error("{stage} failed for {urn} ({uri}): {error}")]
pub struct TaskFailure {
    pub urn: String,
    pub uri: String,
    pub stage: Stage,
    #[source]
    pub error: MinerError,
}

/// What a task reports back to whoever queued it.
pub type TaskOutcome = std::result::Result<TaskReport, TaskFailure>;

/// Sending half of a task's completion signal.
#[derive(Debug)]
pub struct CompletionHandle(oneshot::Sender<TaskOutcome>);

impl CompletionHandle {
    /// Creates a handle and the receiver that observes the outcome.
    pub fn channel() -> (Self, oneshot::Receiver<TaskOutcome>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    /// Delivers the outcome. Returns `false` if nobody is listening.
    pub fn complete(self, outcome: TaskOutcome) -> bool {
        self.0.send(outcome).is_ok()
    }
}

/// An item delivered by an [`ItemQueue`](crate::ItemQueue).
#[derive(Debug)]
pub struct QueueItem {
    /// File reference, typically a `file://` URI.
    pub uri: String,
    /// Subject the metadata is asserted on.
    pub urn: String,
    pub completion: Option<CompletionHandle>,
}

impl QueueItem {
    /// An item nobody waits on.
    pub fn new(uri: impl Into<String>, urn: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            urn: urn.into(),
            completion: None,
        }
    }

    /// An item plus the receiver of its outcome.
    pub fn with_completion(
        uri: impl Into<String>,
        urn: impl Into<String>,
    ) -> (Self, oneshot::Receiver<TaskOutcome>) {
        let (handle, rx) = CompletionHandle::channel();
        let mut item = Self::new(uri, urn);
        item.completion = Some(handle);
        (item, rx)
    }
}

/// A file under processing, owned by the controller until it completes.
#[derive(Debug)]
pub struct FileTask {
    pub uri: String,
    pub urn: String,
    completion: Option<CompletionHandle>,
}

impl FileTask {
    /// Builds a failure at `stage` carrying this task's context.
    pub fn fail(&self, stage: Stage, error: MinerError) -> TaskFailure {
        TaskFailure {
            urn: self.urn.clone(),
            uri: self.uri.clone(),
            stage,
            error,
        }
    }

    /// Reports `outcome` and ends the task.
    pub fn complete(self, outcome: TaskOutcome) {
        if let Some(handle) = self.completion {
            if !handle.complete(outcome) {
                tracing::trace!(urn = %self.urn, "completion receiver dropped");
            }
        }
    }
}

impl From<QueueItem> for FileTask {
    fn from(item: QueueItem) -> Self {
        Self {
            uri: item.uri,
            urn: item.urn,
            completion: item.completion,
        }
    }
}
