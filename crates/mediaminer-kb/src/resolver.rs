//! # Resolver
//!
//! Turns a guessed identity into a knowledge-base identifier. Episodic
//! identities go through an exact structured match; everything else goes
//! through a ranked film search whose best hit must clear
//! [`SCORE_THRESHOLD`].

use mediaminer_core::extract::properties::{EPISODE_TYPE, FILM_TYPE};
use mediaminer_core::{ExternalId, GuessedIdentity, MinerError, Result};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{EpisodeMatch, KnowledgeBase, SearchQuery};

/// A ranked hit must score strictly above this to be accepted.
pub const SCORE_THRESHOLD: f64 = 50.0;

/// Resolves guessed identities against a [`KnowledgeBase`].
#[derive(Debug, Clone)]
pub struct Resolver<K> {
    kb: K,
}

impl<K: KnowledgeBase> Resolver<K> {
    /// Creates a resolver over `kb`.
    pub fn new(kb: K) -> Self {
        Self { kb }
    }

    /// Resolves `identity` to an identifier.
    ///
    /// # Errors
    ///
    /// `MinerError::NotFound` when the service answered without a usable
    /// match, `MinerError::Service`/`Cancelled` when the call itself failed.
    pub async fn resolve(
        &self,
        identity: &GuessedIdentity,
        cancel: &CancellationToken,
    ) -> Result<ExternalId> {
        if identity.is_episodic() {
            self.resolve_episode(identity, cancel).await
        } else {
            self.resolve_film(identity, cancel).await
        }
    }

    async fn resolve_episode(
        &self,
        identity: &GuessedIdentity,
        cancel: &CancellationToken,
    ) -> Result<ExternalId> {
        let query = EpisodeMatch {
            series: identity.title.clone(),
            season: identity.season,
            episode: identity.episode,
            record_type: EPISODE_TYPE.to_string(),
        };

        let ids = self
            .kb
            .structured_query(&query, cancel)
            .await
            .map_err(|e| e.into_miner(format!("structured query for {identity}")))?;

        let id = ids
            .into_iter()
            .next()
            .ok_or_else(|| MinerError::not_found("structured query returned no items"))?;
        debug!(%identity, %id, "resolved episode");
        Ok(id)
    }

    async fn resolve_film(
        &self,
        identity: &GuessedIdentity,
        cancel: &CancellationToken,
    ) -> Result<ExternalId> {
        let query = SearchQuery {
            text: identity.title.clone(),
            record_type: FILM_TYPE.to_string(),
            limit: 1,
        };

        let hits = self
            .kb
            .ranked_search(&query, cancel)
            .await
            .map_err(|e| e.into_miner(format!("ranked search for {identity}")))?;

        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| MinerError::not_found("no result items"))?;

        if hit.score <= SCORE_THRESHOLD {
            return Err(MinerError::not_found(format!(
                "best score {} not above threshold {SCORE_THRESHOLD}",
                hit.score
            )));
        }

        let id = hit
            .id
            .ok_or_else(|| MinerError::not_found("search result carries no identifier"))?;
        debug!(%identity, %id, score = hit.score, "resolved film");
        Ok(id)
    }
}
