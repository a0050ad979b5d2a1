//! # Output sinks
//!
//! Where update batches go. The host normally supplies its own store;
//! [`MemorySink`] and [`SparqlWriterSink`] cover tests, dry runs and the CLI.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use mediaminer_core::update::{Object, Statement};
use mediaminer_core::{MinerError, Result, UpdateBatch};

/// Accepts update batches and applies each one atomically.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Applies `batch`.
    ///
    /// # Errors
    ///
    /// `MinerError::Sink` if the batch could not be applied; nothing from it
    /// may be visible in that case.
    async fn apply(&self, batch: &UpdateBatch) -> Result<()>;
}

/// One stored statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Quad {
    pub graph: String,
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

/// In-memory quad store with set semantics.
#[derive(Debug, Default)]
pub struct MemorySink {
    quads: Mutex<Vec<Quad>>,
}

impl MemorySink {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects stored for (`subject`, `predicate`) in any graph.
    pub fn objects(&self, subject: &str, predicate: &str) -> Vec<Object> {
        self.lock()
            .iter()
            .filter(|q| q.subject == subject && q.predicate == predicate)
            .map(|q| q.object.clone())
            .collect()
    }

    /// Snapshot of every stored quad.
    pub fn quads(&self) -> Vec<Quad> {
        self.lock().clone()
    }

    /// Number of stored quads.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Quad>> {
        // A poisoned lock still holds a consistent store: batches are applied
        // to a copy and swapped in.
        self.quads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn apply(&self, batch: &UpdateBatch) -> Result<()> {
        let mut quads = self.lock();
        let mut next = quads.clone();

        for statement in &batch.statements {
            match statement {
                Statement::Retract { subject, predicate } => {
                    next.retain(|q| !(q.subject == *subject && q.predicate == *predicate));
                }
                Statement::Assert {
                    subject,
                    predicate,
                    object,
                } => {
                    let quad = Quad {
                        graph: batch.graph.clone(),
                        subject: subject.clone(),
                        predicate: predicate.clone(),
                        object: object.clone(),
                    };
                    if !next.contains(&quad) {
                        next.push(quad);
                    }
                }
            }
        }

        *quads = next;
        Ok(())
    }
}

/// Writes each batch as SPARQL Update text.
#[derive(Debug)]
pub struct SparqlWriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> SparqlWriterSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> OutputSink for SparqlWriterSink<W> {
    async fn apply(&self, batch: &UpdateBatch) -> Result<()> {
        let sparql = batch.to_sparql();
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| MinerError::Sink("writer lock poisoned".into()))?;
        writeln!(writer, "# {}\n{sparql}", batch.subject)
            .and_then(|()| writer.flush())
            .map_err(|e| MinerError::Sink(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mediaminer_core::update::{NIE_TITLE, NMM_GENRE};
    use mediaminer_core::UpdateScope;

    use super::*;

    fn batch(title: &str) -> UpdateBatch {
        let mut batch = UpdateBatch::new("urn:file:1", &UpdateScope::default());
        batch.retract(NIE_TITLE);
        batch.assert(NIE_TITLE, Object::Literal(title.into()));
        batch.assert(NMM_GENRE, Object::Literal("Thriller".into()));
        batch
    }

    #[tokio::test]
    async fn retract_replaces_previous_value() {
        let sink = MemorySink::new();
        sink.apply(&batch("Old")).await.unwrap();
        sink.apply(&batch("New")).await.unwrap();

        assert_eq!(sink.objects("urn:file:1", NIE_TITLE), [Object::Literal("New".into())]);
        assert_eq!(sink.objects("urn:file:1", NMM_GENRE).len(), 1);
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn writer_sink_emits_sparql() {
        let sink = SparqlWriterSink::new(Vec::new());
        sink.apply(&batch("Inception")).await.unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert!(text.starts_with("# urn:file:1\nDELETE { <urn:file:1> nie:title ?unbound }"));
        assert!(text.contains("nie:title \"Inception\" ."));
    }
}
