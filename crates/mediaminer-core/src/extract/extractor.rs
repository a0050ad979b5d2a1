//! # Metadata extraction
//!
//! Maps a fetched [`TopicRecord`] onto a [`MetadataRecord`]. The episode and
//! film paths are kept apart; the only shared rules are title, synopsis and
//! the date conversion.
//!
//! Absent values never fail extraction. Per field:
//! - title, synopsis, date, rating, genre: absent (or empty) ⇒ `None`
//! - date: non-positive epoch ⇒ `None`
//! - runtime: missing runtime compound or missing minutes inside it ⇒ `None`
//! - season/episode: missing on the record ⇒ the guessed numbers
//! - people: entries without a usable name are skipped

use chrono::{DateTime, Utc};
use tracing::debug;

use super::properties as prop;
use crate::types::{ArtistRef, GuessedIdentity, MetadataRecord, TopicRecord};

/// Stateless extractor; see [`extract`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Creates a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts a metadata record. The identity selects the episode or film path.
    pub fn extract(&self, record: &TopicRecord, identity: &GuessedIdentity) -> MetadataRecord {
        let mut out = MetadataRecord {
            title: first_text(record, prop::NAME),
            synopsis: first_text(record, prop::DESCRIPTION),
            ..Default::default()
        };

        if identity.is_episodic() {
            self.extract_episode(record, identity, &mut out);
        } else {
            self.extract_film(record, &mut out);
        }

        debug!(
            id = record.id.as_deref().unwrap_or("-"),
            title = out.title.as_deref().unwrap_or("-"),
            episodic = out.is_episodic,
            "extracted metadata"
        );
        out
    }

    fn extract_episode(
        &self,
        record: &TopicRecord,
        identity: &GuessedIdentity,
        out: &mut MetadataRecord,
    ) {
        out.is_episodic = true;
        out.release_date = epoch_date(record, prop::EPISODE_AIR_DATE);
        out.season = number(record, prop::EPISODE_SEASON_NUMBER).unwrap_or(identity.season);
        out.episode = number(record, prop::EPISODE_NUMBER).unwrap_or(identity.episode);
        out.directors = people(record, prop::EPISODE_DIRECTOR);
        out.producers = first_person(record, prop::EPISODE_PRODUCERS);
    }

    fn extract_film(&self, record: &TopicRecord, out: &mut MetadataRecord) {
        out.is_episodic = false;
        out.release_date = epoch_date(record, prop::FILM_RELEASE_DATE);
        out.rating = first_text(record, prop::FILM_RATING);
        out.runtime_minutes = record
            .record(prop::FILM_RUNTIME, 0)
            .and_then(|cut| cut.double(prop::FILM_CUT_RUNTIME, 0));
        out.genre = first_text(record, prop::FILM_GENRE);
        out.directors = people(record, prop::FILM_DIRECTED_BY);
        out.producers = first_person(record, prop::FILM_PRODUCED_BY);
        out.actors = record
            .values(prop::FILM_STARRING)
            .iter()
            .filter_map(|performance| performance.as_record())
            .filter_map(|performance| non_empty(performance.text(prop::PERFORMANCE_ACTOR, 0)))
            .map(ArtistRef::from_name)
            .collect();
    }
}

/// Extracts a metadata record with a default [`MetadataExtractor`].
pub fn extract(record: &TopicRecord, identity: &GuessedIdentity) -> MetadataRecord {
    MetadataExtractor::new().extract(record, identity)
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

fn first_text(record: &TopicRecord, property: &str) -> Option<String> {
    non_empty(record.text(property, 0)).map(str::to_string)
}

fn epoch_date(record: &TopicRecord, property: &str) -> Option<DateTime<Utc>> {
    let value = record.value(property, 0)?;
    let secs = value.as_timestamp().or_else(|| value.as_int())?;
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

fn number(record: &TopicRecord, property: &str) -> Option<u32> {
    record
        .int(property, 0)
        .and_then(|value| u32::try_from(value).ok())
}

fn people(record: &TopicRecord, property: &str) -> Vec<ArtistRef> {
    record
        .values(property)
        .iter()
        .filter_map(|value| non_empty(value.as_text()))
        .map(ArtistRef::from_name)
        .collect()
}

// Producers are cardinality-one in the output schema.
fn first_person(record: &TopicRecord, property: &str) -> Vec<ArtistRef> {
    people(record, property).into_iter().take(1).collect()
}
