use std::fmt;

use serde::{Deserialize, Serialize};

/// The (title, season, episode) tuple guessed from a filename.
///
/// Season and episode use `0` for "unset". A guess is episodic only when
/// both are set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GuessedIdentity {
    /// Cleaned title, tokens joined by single spaces. May be empty.
    pub title: String,
    /// Season number, `0` when unset.
    pub season: u32,
    /// Episode number, `0` when unset.
    pub episode: u32,
}

impl GuessedIdentity {
    /// Creates a film-style identity with no season/episode.
    #[must_use]
    pub fn film(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            season: 0,
            episode: 0,
        }
    }

    /// Creates an identity carrying season/episode numbers.
    #[must_use]
    pub fn episode(title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            title: title.into(),
            season,
            episode,
        }
    }

    /// Returns `true` when both season and episode are set.
    #[must_use]
    pub fn is_episodic(&self) -> bool {
        self.season > 0 && self.episode > 0
    }
}

impl fmt::Display for GuessedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_episodic() {
            write!(f, "{:?} S{:02}E{:02}", self.title, self.season, self.episode)
        } else {
            write!(f, "{:?}", self.title)
        }
    }
}

/// Opaque identifier of a record in the external knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalId(String);

impl ExternalId {
    /// Wraps a raw identifier such as `/m/0661ql3`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episodic_requires_both_numbers() {
        assert!(GuessedIdentity::episode("Show", 1, 2).is_episodic());
        assert!(!GuessedIdentity::episode("Show", 1, 0).is_episodic());
        assert!(!GuessedIdentity::episode("Show", 0, 3).is_episodic());
        assert!(!GuessedIdentity::film("Inception").is_episodic());
        assert!(!GuessedIdentity::default().is_episodic());
    }

    #[test]
    fn identity_display() {
        assert_eq!(
            GuessedIdentity::episode("Show Name", 1, 2).to_string(),
            "\"Show Name\" S01E02"
        );
        assert_eq!(GuessedIdentity::film("Inception").to_string(), "\"Inception\"");
    }

    #[test]
    fn external_id_is_transparent_in_json() {
        let id = ExternalId::new("/m/0661ql3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"/m/0661ql3\"");
        assert_eq!(id.as_str(), "/m/0661ql3");
    }
}
