//! # Pipeline controller
//!
//! Drains an [`ItemQueue`] one file at a time. A file's outcome is reported
//! before the next file is requested, and every outcome (success or
//! failure) is followed by exactly one request for the next file.
//!
//! Cancellation goes through a [`ControllerHandle`]: cancelling fires the
//! token the in-flight calls were given and installs a fresh one at once,
//! so the next file never starts out cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mediaminer_core::{MinerError, Result};
use mediaminer_kb::{HttpKnowledgeBase, KnowledgeBase};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MinerConfig;
use crate::queue::ItemQueue;
use crate::sink::OutputSink;
use crate::state::Pipeline;
use crate::task::{FileTask, Stage, TaskOutcome};

#[derive(Debug, Default)]
struct Shared {
    paused: AtomicBool,
    token: Mutex<CancellationToken>,
}

/// Host-side control over a running [`Controller`].
#[derive(Debug, Clone, Default)]
pub struct ControllerHandle {
    shared: Arc<Shared>,
}

impl ControllerHandle {
    /// Cancels the in-flight call and stops requesting new files.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
        self.cancel_current();
    }

    /// Allows the controller to request files again.
    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Cancels the in-flight call only; draining continues with the next file.
    pub fn cancel_current(&self) {
        let mut token = self.lock();
        token.cancel();
        *token = CancellationToken::new();
    }

    /// The token for the next file, replacing it first if it has fired.
    fn token_for_next_file(&self) -> CancellationToken {
        let mut token = self.lock();
        if token.is_cancelled() {
            *token = CancellationToken::new();
        }
        token.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.shared.token.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Counters for one [`Controller::drain`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Files that reached a terminal state.
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Next-file requests issued after a terminal outcome.
    pub next_requests: usize,
}

/// Sequential metadata miner.
pub struct Controller {
    pipeline: Pipeline,
    handle: ControllerHandle,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("paused", &self.handle.is_paused())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Creates a controller over `kb` writing into `sink`.
    ///
    /// # Errors
    ///
    /// Returns `MinerError::RegexError` if the guesser cannot be built.
    pub fn new(
        kb: Arc<dyn KnowledgeBase>,
        sink: Arc<dyn OutputSink>,
        config: &MinerConfig,
    ) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(kb, sink, config.scope())?,
            handle: ControllerHandle::default(),
        })
    }

    /// Creates a controller over an [`HttpKnowledgeBase`] built from `config.kb`.
    ///
    /// # Errors
    ///
    /// Returns `MinerError::Service` if the HTTP client cannot be built.
    pub fn with_http(config: &MinerConfig, sink: Arc<dyn OutputSink>) -> Result<Self> {
        let kb = HttpKnowledgeBase::new(config.kb.clone())
            .map_err(|e| e.into_miner("building HTTP client"))?;
        Self::new(Arc::new(kb), sink, config)
    }

    /// A handle for pausing or cancelling from another task.
    pub fn handle(&self) -> ControllerHandle {
        self.handle.clone()
    }

    /// Processes queued files until the queue is empty or the controller is paused.
    pub async fn drain<Q: ItemQueue + ?Sized>(&mut self, queue: &mut Q) -> DrainReport {
        let mut report = DrainReport::default();
        let mut next = self.request_next(queue).await;

        while let Some(item) = next {
            let task = FileTask::from(item);
            let outcome = self.process(&task).await;

            report.processed += 1;
            match &outcome {
                Ok(done) => {
                    report.succeeded += 1;
                    info!(
                        urn = %done.urn,
                        uri = %done.uri,
                        id = %done.id,
                        title = done.record.title.as_deref().unwrap_or("-"),
                        "metadata extracted"
                    );
                }
                Err(failure) => {
                    report.failed += 1;
                    warn!(
                        urn = %failure.urn,
                        uri = %failure.uri,
                        stage = %failure.stage,
                        kind = %failure.error.kind(),
                        error = %failure.error,
                        "file failed"
                    );
                }
            }
            task.complete(outcome);

            report.next_requests += 1;
            next = self.request_next(queue).await;
        }

        debug!(?report, "queue drained");
        report
    }

    /// Runs one file through the pipeline with a fresh cancellation token.
    ///
    /// A file handed out just before a pause fails as cancelled without
    /// touching the knowledge base.
    pub async fn process(&self, task: &FileTask) -> TaskOutcome {
        let cancel = self.handle.token_for_next_file();
        if self.handle.is_paused() || cancel.is_cancelled() {
            return Err(task.fail(
                Stage::Guessing,
                MinerError::Cancelled {
                    operation: format!("processing {}", task.uri),
                },
            ));
        }
        self.pipeline.run(task, &cancel).await
    }

    async fn request_next<Q: ItemQueue + ?Sized>(&self, queue: &mut Q) -> Option<crate::QueueItem> {
        if self.handle.is_paused() {
            debug!("paused, not requesting next file");
            return None;
        }
        if queue.remaining() == 0 {
            return None;
        }
        queue.next_item().await
    }
}
