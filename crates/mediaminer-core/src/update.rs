//! # Update batches
//!
//! A [`MetadataRecord`] becomes one [`UpdateBatch`]: generic retractions for
//! the single-valued fields being replaced, followed by assertions scoped to
//! the miner's graph. Applying the same batch twice leaves the store as
//! applying it once.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::types::MetadataRecord;

pub const RDF_TYPE: &str = "rdf:type";
pub const NIE_DATA_SOURCE: &str = "nie:dataSource";
pub const NIE_TITLE: &str = "nie:title";
pub const NIE_CONTENT_CREATED: &str = "nie:contentCreated";
pub const NMM_SYNOPSIS: &str = "nmm:synopsis";
pub const NMM_IS_SERIES: &str = "nmm:isSeries";
pub const NMM_SEASON: &str = "nmm:season";
pub const NMM_EPISODE_NUMBER: &str = "nmm:episodeNumber";
pub const NMM_MPAA_RATING: &str = "nmm:MPAARating";
pub const NFO_DURATION: &str = "nfo:duration";
pub const NMM_GENRE: &str = "nmm:genre";
pub const NMM_DIRECTOR: &str = "nmm:director";
pub const NMM_PRODUCED_BY: &str = "nmm:producedBy";
pub const NMM_LEAD_ACTOR: &str = "nmm:leadActor";
pub const NMM_ARTIST: &str = "nmm:Artist";
pub const NMM_ARTIST_NAME: &str = "nmm:artistName";

/// Default graph the miner writes into.
pub const DEFAULT_GRAPH: &str = "urn:mediaminer:graph";
/// Default data source attached to every enriched subject.
pub const DEFAULT_DATA_SOURCE: &str = "tmm:urn:83443497-b4cf-4341-8ac8-74058828f6db";

/// Graph and data source every batch is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateScope {
    pub graph: String,
    pub data_source: String,
}

impl Default for UpdateScope {
    fn default() -> Self {
        Self {
            graph: DEFAULT_GRAPH.to_string(),
            data_source: DEFAULT_DATA_SOURCE.to_string(),
        }
    }
}

/// Object position of an asserted statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Object {
    /// Resource by full IRI, rendered as `<...>`.
    Iri(String),
    /// Ontology term by prefixed name, rendered bare.
    Term(String),
    Literal(String),
    Integer(i64),
    Boolean(bool),
    /// `xsd:dateTime` in `YYYY-MM-DDTHH:MM:SSZ` form.
    DateTime(String),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::Term(term) => f.write_str(term),
            Self::Literal(text) => write!(f, "\"{}\"", escape_literal(text)),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::DateTime(value) => write!(f, "\"{}\"^^xsd:dateTime", escape_literal(value)),
        }
    }
}

/// One retract or assert statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Remove every value of `predicate` on `subject`, in any graph.
    Retract { subject: String, predicate: String },
    /// Add a value, scoped to the batch's graph.
    Assert {
        subject: String,
        predicate: String,
        object: Object,
    },
}

/// Retractions and assertions for one subject, applied as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBatch {
    pub graph: String,
    pub data_source: String,
    /// Subject the metadata describes.
    pub subject: String,
    pub statements: Vec<Statement>,
}

impl UpdateBatch {
    /// Creates an empty batch for `subject`.
    #[must_use]
    pub fn new(subject: impl Into<String>, scope: &UpdateScope) -> Self {
        Self {
            graph: scope.graph.clone(),
            data_source: scope.data_source.clone(),
            subject: subject.into(),
            statements: Vec::new(),
        }
    }

    /// Builds the batch for `record`.
    ///
    /// Title and date are retracted before being asserted, and only when a
    /// new value exists. Artists are asserted once each, ahead of the subject.
    #[must_use]
    pub fn for_record(subject: impl Into<String>, record: &MetadataRecord, scope: &UpdateScope) -> Self {
        let mut batch = Self::new(subject, scope);

        for artist in record.artists() {
            batch.assert_on(&artist.id, RDF_TYPE, Object::Term(NMM_ARTIST.into()));
            batch.assert_on(&artist.id, NMM_ARTIST_NAME, Object::Literal(artist.name.clone()));
        }

        batch.assert(NIE_DATA_SOURCE, Object::Iri(scope.data_source.clone()));

        if let Some(title) = &record.title {
            batch.retract(NIE_TITLE);
            batch.assert(NIE_TITLE, Object::Literal(title.clone()));
        }
        if let Some(date) = record.release_date_iso() {
            batch.retract(NIE_CONTENT_CREATED);
            batch.assert(NIE_CONTENT_CREATED, Object::DateTime(date));
        }
        if let Some(synopsis) = &record.synopsis {
            batch.assert(NMM_SYNOPSIS, Object::Literal(synopsis.clone()));
        }

        if record.is_episodic {
            batch.assert(NMM_IS_SERIES, Object::Boolean(true));
            batch.assert(NMM_SEASON, Object::Integer(i64::from(record.season)));
            batch.assert(NMM_EPISODE_NUMBER, Object::Integer(i64::from(record.episode)));
        } else {
            if let Some(rating) = &record.rating {
                batch.assert(NMM_MPAA_RATING, Object::Literal(rating.clone()));
            }
            if let Some(minutes) = record.runtime_minutes {
                // nfo:duration is in seconds.
                batch.assert(NFO_DURATION, Object::Integer((minutes * 60.0).round() as i64));
            }
            if let Some(genre) = &record.genre {
                batch.assert(NMM_GENRE, Object::Literal(genre.clone()));
            }
        }

        for director in &record.directors {
            batch.assert(NMM_DIRECTOR, Object::Iri(director.id.clone()));
        }
        if let Some(producer) = record.producers.first() {
            batch.assert(NMM_PRODUCED_BY, Object::Iri(producer.id.clone()));
        }
        for actor in &record.actors {
            batch.assert(NMM_LEAD_ACTOR, Object::Iri(actor.id.clone()));
        }

        batch
    }

    /// Adds a generic retraction of `predicate` on the batch subject.
    pub fn retract(&mut self, predicate: &str) {
        self.statements.push(Statement::Retract {
            subject: self.subject.clone(),
            predicate: predicate.to_string(),
        });
    }

    /// Adds an assertion on the batch subject.
    pub fn assert(&mut self, predicate: &str, object: Object) {
        let subject = self.subject.clone();
        self.assert_on(&subject, predicate, object);
    }

    /// Adds an assertion on another subject (e.g. an artist).
    pub fn assert_on(&mut self, subject: &str, predicate: &str, object: Object) {
        self.statements.push(Statement::Assert {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object,
        });
    }

    /// Returns `true` if the batch holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Renders the batch as a single SPARQL Update.
    #[must_use]
    pub fn to_sparql(&self) -> String {
        let mut out = String::new();

        for statement in &self.statements {
            if let Statement::Retract { subject, predicate } = statement {
                let _ = writeln!(
                    out,
                    "DELETE {{ <{subject}> {predicate} ?unbound }} WHERE {{ <{subject}> {predicate} ?unbound }}"
                );
            }
        }

        let asserts: Vec<_> = self
            .statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Assert {
                    subject,
                    predicate,
                    object,
                } => Some((subject, predicate, object)),
                Statement::Retract { .. } => None,
            })
            .collect();

        if !asserts.is_empty() {
            let _ = writeln!(out, "INSERT {{ GRAPH <{}> {{", self.graph);
            for (subject, predicate, object) in asserts {
                let predicate = if predicate == RDF_TYPE { "a" } else { predicate.as_str() };
                let _ = writeln!(out, "  <{subject}> {predicate} {object} .");
            }
            out.push_str("} }\n");
        }

        out
    }
}

impl MetadataRecord {
    /// Builds the update batch for this record; see [`UpdateBatch::for_record`].
    #[must_use]
    pub fn to_update(&self, subject: impl Into<String>, scope: &UpdateScope) -> UpdateBatch {
        UpdateBatch::for_record(subject, self, scope)
    }
}

fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
