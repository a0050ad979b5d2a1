//! # Task state machine
//!
//! `Guessing → Resolving → Fetching → Extracting → Persisting → Done`, with
//! `Failed` reachable from every stage that can fail. Each transition is a
//! function from one state's output to the next state; [`Pipeline::run`]
//! drives them until a terminal state.

use std::sync::Arc;

use mediaminer_core::{
    ExternalId, GuessedIdentity, IdentityGuesser, MetadataExtractor, MetadataRecord, Result,
    TopicRecord, UpdateScope,
};
use mediaminer_kb::{Fetcher, KnowledgeBase, Resolver};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::sink::OutputSink;
use crate::task::{FileTask, Stage, TaskFailure, TaskOutcome, TaskReport};

/// State of one file task.
#[derive(Debug)]
pub enum TaskState {
    Guessing,
    Resolving {
        identity: GuessedIdentity,
    },
    Fetching {
        identity: GuessedIdentity,
        id: ExternalId,
    },
    Extracting {
        identity: GuessedIdentity,
        id: ExternalId,
        topic: TopicRecord,
    },
    Persisting {
        identity: GuessedIdentity,
        id: ExternalId,
        record: MetadataRecord,
    },
    Done(TaskReport),
    Failed(TaskFailure),
}

impl TaskState {
    /// The stage this state belongs to; `None` once terminal.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Guessing => Some(Stage::Guessing),
            Self::Resolving { .. } => Some(Stage::Resolving),
            Self::Fetching { .. } => Some(Stage::Fetching),
            Self::Extracting { .. } => Some(Stage::Extracting),
            Self::Persisting { .. } => Some(Stage::Persisting),
            Self::Done(_) | Self::Failed(_) => None,
        }
    }

    /// Returns `true` for `Done` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        self.stage().is_none()
    }
}

/// The per-file stages wired to their collaborators.
pub(crate) struct Pipeline {
    guesser: IdentityGuesser,
    resolver: Resolver<Arc<dyn KnowledgeBase>>,
    fetcher: Fetcher<Arc<dyn KnowledgeBase>>,
    extractor: MetadataExtractor,
    sink: Arc<dyn OutputSink>,
    scope: UpdateScope,
}

impl Pipeline {
    pub fn new(
        kb: Arc<dyn KnowledgeBase>,
        sink: Arc<dyn OutputSink>,
        scope: UpdateScope,
    ) -> Result<Self> {
        Ok(Self {
            guesser: IdentityGuesser::new()?,
            resolver: Resolver::new(Arc::clone(&kb)),
            fetcher: Fetcher::new(kb),
            extractor: MetadataExtractor::new(),
            sink,
            scope,
        })
    }

    /// Drives `task` from `Guessing` to a terminal state.
    pub async fn run(&self, task: &FileTask, cancel: &CancellationToken) -> TaskOutcome {
        let mut state = TaskState::Guessing;
        loop {
            state = match state {
                TaskState::Done(report) => return Ok(report),
                TaskState::Failed(failure) => return Err(failure),
                current => self.step(task, current, cancel).await,
            };
        }
    }

    /// Performs one transition.
    pub async fn step(
        &self,
        task: &FileTask,
        state: TaskState,
        cancel: &CancellationToken,
    ) -> TaskState {
        let (stage, next) = match state {
            TaskState::Guessing => (Stage::Guessing, Ok(self.guess(task))),
            TaskState::Resolving { identity } => {
                (Stage::Resolving, self.resolve(identity, cancel).await)
            }
            TaskState::Fetching { identity, id } => {
                (Stage::Fetching, self.fetch(identity, id, cancel).await)
            }
            TaskState::Extracting {
                identity,
                id,
                topic,
            } => (Stage::Extracting, Ok(self.extract(identity, id, &topic))),
            TaskState::Persisting {
                identity,
                id,
                record,
            } => (Stage::Persisting, self.persist(task, identity, id, record).await),
            terminal => return terminal,
        };

        match next {
            Ok(state) => {
                debug!(urn = %task.urn, from = %stage, to = ?state.stage(), "transition");
                state
            }
            Err(error) => TaskState::Failed(task.fail(stage, error)),
        }
    }

    fn guess(&self, task: &FileTask) -> TaskState {
        let identity = self.guesser.guess_uri(&task.uri);
        debug!(urn = %task.urn, %identity, episodic = identity.is_episodic(), "guessed identity");
        TaskState::Resolving { identity }
    }

    async fn resolve(
        &self,
        identity: GuessedIdentity,
        cancel: &CancellationToken,
    ) -> Result<TaskState> {
        let id = self.resolver.resolve(&identity, cancel).await?;
        Ok(TaskState::Fetching { identity, id })
    }

    async fn fetch(
        &self,
        identity: GuessedIdentity,
        id: ExternalId,
        cancel: &CancellationToken,
    ) -> Result<TaskState> {
        let topic = self.fetcher.fetch(&id, cancel).await?;
        Ok(TaskState::Extracting {
            identity,
            id,
            topic,
        })
    }

    fn extract(&self, identity: GuessedIdentity, id: ExternalId, topic: &TopicRecord) -> TaskState {
        let record = self.extractor.extract(topic, &identity);
        TaskState::Persisting {
            identity,
            id,
            record,
        }
    }

    async fn persist(
        &self,
        task: &FileTask,
        identity: GuessedIdentity,
        id: ExternalId,
        record: MetadataRecord,
    ) -> Result<TaskState> {
        let batch = record.to_update(task.urn.clone(), &self.scope);
        self.sink.apply(&batch).await?;
        Ok(TaskState::Done(TaskReport {
            urn: task.urn.clone(),
            uri: task.uri.clone(),
            identity,
            id,
            record,
            batch,
        }))
    }
}
