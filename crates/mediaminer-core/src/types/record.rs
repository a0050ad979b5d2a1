use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of synthetic artist identifiers.
pub const ARTIST_URN_PREFIX: &str = "urn:artist:";

/// A named person referenced by a metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Stable identifier derived from the name.
    pub id: String,
    /// Display name as found in the source record.
    pub name: String,
}

impl ArtistRef {
    /// Builds an artist reference with an identifier of the form
    /// `urn:artist:<percent-encoded name>`.
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = format!("{ARTIST_URN_PREFIX}{}", urlencoding::encode(&name));
        Self { id, name }
    }
}

/// Metadata extracted for one video file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Canonical title.
    pub title: Option<String>,
    /// Description text.
    pub synopsis: Option<String>,
    /// Air date for episodes, initial release date for films.
    pub release_date: Option<DateTime<Utc>>,
    /// Whether this record describes a series episode.
    pub is_episodic: bool,
    /// Season number (episodes only).
    pub season: u32,
    /// Episode number (episodes only).
    pub episode: u32,
    /// Content rating (films only).
    pub rating: Option<String>,
    /// Runtime in minutes (films only).
    pub runtime_minutes: Option<f64>,
    /// First genre of the source record (films only).
    pub genre: Option<String>,
    /// Directors in source order.
    pub directors: Vec<ArtistRef>,
    /// At most one producer.
    pub producers: Vec<ArtistRef>,
    /// Lead actors in source order (films only).
    pub actors: Vec<ArtistRef>,
}

impl MetadataRecord {
    /// Release/air date as `YYYY-MM-DDTHH:MM:SSZ`.
    #[must_use]
    pub fn release_date_iso(&self) -> Option<String> {
        self.release_date
            .map(|date| date.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    /// Every artist referenced by the record, deduplicated by identifier,
    /// in first-seen order.
    #[must_use]
    pub fn artists(&self) -> Vec<&ArtistRef> {
        let mut seen = std::collections::HashSet::new();
        self.directors
            .iter()
            .chain(&self.producers)
            .chain(&self.actors)
            .filter(|artist| seen.insert(artist.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_ids_are_percent_encoded() {
        let artist = ArtistRef::from_name("Christopher Nolan");
        assert_eq!(artist.id, "urn:artist:Christopher%20Nolan");
        assert_eq!(artist.name, "Christopher Nolan");

        let artist = ArtistRef::from_name("Zoë Kravitz");
        assert_eq!(artist.id, "urn:artist:Zo%C3%AB%20Kravitz");
    }

    #[test]
    fn release_date_formats_as_utc() {
        let record = MetadataRecord {
            release_date: DateTime::from_timestamp(1_287_878_400, 0),
            ..Default::default()
        };
        assert_eq!(record.release_date_iso().as_deref(), Some("2010-10-24T00:00:00Z"));
        assert_eq!(MetadataRecord::default().release_date_iso(), None);
    }

    #[test]
    fn artists_are_deduplicated() {
        let nolan = ArtistRef::from_name("Christopher Nolan");
        let record = MetadataRecord {
            directors: vec![nolan.clone()],
            producers: vec![nolan.clone()],
            actors: vec![ArtistRef::from_name("Elliot Page"), nolan],
            ..Default::default()
        };
        let names: Vec<_> = record.artists().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Christopher Nolan", "Elliot Page"]);
    }
}
