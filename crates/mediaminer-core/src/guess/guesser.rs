use regex::Regex;
use tracing::trace;

use super::tokenizer::Tokenizer;
use crate::error::Result;
use crate::types::GuessedIdentity;

/// Guesses a title and optional season/episode numbers from a filename.
///
/// Tokens are scanned left to right. The first `S01E02`, `s01e02` or `1x02`
/// token is taken as the episode marker and dropped from the title; later
/// marker-shaped tokens are kept as ordinary words, as are mixed-case forms
/// such as `s01E02`. Years (1900-2099) and tokens opening with `[` or `(`
/// are dropped, but only once the title has at least one word, so a title
/// such as `1984` survives.
#[derive(Debug, Clone)]
pub struct IdentityGuesser {
    tokenizer: Tokenizer,
    re_episode: Regex,
    re_year: Regex,
}

impl IdentityGuesser {
    /// Constructs a new `IdentityGuesser` with pre-compiled regex patterns.
    ///
    /// # Errors
    ///
    /// Returns `MinerError::RegexError` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(),
            re_episode: Regex::new(r"^(?:S(\d+)E(\d+)|s(\d+)e(\d+)|(\d+)x(\d+))$")?,
            re_year: Regex::new(r"^(?:19|20)\d{2}$")?,
        })
    }

    /// Guesses an identity from a file stem (extension already removed).
    ///
    /// Never fails: an unrecognisable name yields its cleaned text as the
    /// title, and an empty name yields an empty title.
    pub fn guess(&self, stem: &str) -> GuessedIdentity {
        let mut title: Vec<&str> = Vec::new();
        let mut season = 0;
        let mut episode = 0;
        let mut marker_seen = false;

        for token in self.tokenizer.tokenize(stem) {
            if !marker_seen {
                if let Some((s, e)) = self.episode_marker(token.text) {
                    trace!(token = token.text, season = s, episode = e, "episode marker");
                    season = s;
                    episode = e;
                    marker_seen = true;
                    continue;
                }
            }

            if !title.is_empty() && self.is_noise(token.text) {
                trace!(token = token.text, "dropping noise token");
                continue;
            }

            title.push(token.text);
        }

        GuessedIdentity {
            title: title.join(" "),
            season,
            episode,
        }
    }

    /// Guesses an identity from a filename, stripping its extension first.
    pub fn guess_filename(&self, filename: &str) -> GuessedIdentity {
        self.guess(strip_extension(filename))
    }

    /// Guesses an identity from a file URI such as `file:///videos/Inception.2010.mkv`.
    pub fn guess_uri(&self, uri: &str) -> GuessedIdentity {
        self.guess(&file_stem_from_uri(uri))
    }

    fn episode_marker(&self, token: &str) -> Option<(u32, u32)> {
        let caps = self.re_episode.captures(token)?;
        let season = caps.get(1).or_else(|| caps.get(3)).or_else(|| caps.get(5))?;
        let episode = caps.get(2).or_else(|| caps.get(4)).or_else(|| caps.get(6))?;
        Some((season.as_str().parse().ok()?, episode.as_str().parse().ok()?))
    }

    fn is_noise(&self, token: &str) -> bool {
        token.starts_with('[') || token.starts_with('(') || self.re_year.is_match(token)
    }
}

/// Returns the percent-decoded last path segment of `uri` without its extension.
pub fn file_stem_from_uri(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let decoded = urlencoding::decode(segment)
        .map(|name| name.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    strip_extension(&decoded).to_string()
}

fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => &filename[..pos],
        _ => filename,
    }
}
