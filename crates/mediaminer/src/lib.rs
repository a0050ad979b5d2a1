//! # Mediaminer
//!
//! Enriches video files with title, dates, synopsis, people and ratings
//! looked up in a remote knowledge base. A [`Controller`] drains an
//! [`ItemQueue`] one file at a time: guess an identity from the filename,
//! resolve it to a knowledge-base id, fetch the record, extract a
//! [`MetadataRecord`] and hand the resulting update batch to an
//! [`OutputSink`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mediaminer::{Controller, MemorySink, MinerConfig, QueueItem, VecQueue};
//!
//! # async fn demo() -> mediaminer::Result<()> {
//! let sink = Arc::new(MemorySink::new());
//! let mut controller = Controller::with_http(&MinerConfig::default(), sink)?;
//! let mut queue = VecQueue::new([QueueItem::new("file:///videos/Inception.2010.mkv", "urn:video:1")]);
//!
//! let report = controller.drain(&mut queue).await;
//! println!("{} succeeded, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod controller;
pub mod queue;
pub mod sink;
pub mod state;
pub mod task;

pub use config::MinerConfig;
pub use controller::{Controller, ControllerHandle, DrainReport};
pub use queue::{ItemQueue, VecQueue};
pub use sink::{MemorySink, OutputSink, SparqlWriterSink};
pub use state::TaskState;
pub use task::{CompletionHandle, FileTask, QueueItem, Stage, TaskFailure, TaskOutcome, TaskReport};

pub use mediaminer_core::{
    ErrorKind, ExternalId, GuessedIdentity, MetadataRecord, MinerError, Result, UpdateBatch,
    UpdateScope,
};
pub use mediaminer_kb::{HttpKnowledgeBase, KbConfig, KnowledgeBase};
