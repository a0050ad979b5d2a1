use std::sync::Arc;

use async_trait::async_trait;
use mediaminer_core::{ExternalId, TopicRecord};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Structured match for a series episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMatch {
    /// Series name, compared for equality.
    pub series: String,
    pub season: u32,
    pub episode: u32,
    /// Record type to match, e.g. `/tv/tv_series_episode`.
    pub record_type: String,
}

/// Ranked text search restricted to one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    /// Record type filter, e.g. `/film/film`.
    pub record_type: String,
    /// Maximum number of ranked results.
    pub limit: u32,
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identifier, absent when the payload carried none.
    pub id: Option<ExternalId>,
    pub name: Option<String>,
    /// Relevance score as reported by the service.
    pub score: f64,
}

/// The three knowledge-base operations the miner consumes.
///
/// Every call takes the cancellation token of the file being processed and
/// must return [`KbError::Cancelled`](crate::KbError::Cancelled) once it fires.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Returns candidate identifiers matching `query` exactly; usually zero or one.
    async fn structured_query(
        &self,
        query: &EpisodeMatch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExternalId>>;

    /// Returns ranked results, best first.
    async fn ranked_search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchHit>>;

    /// Fetches the full property tree of `id`.
    async fn fetch_topic(&self, id: &ExternalId, cancel: &CancellationToken)
    -> Result<TopicRecord>;
}

#[async_trait]
impl<K: KnowledgeBase + ?Sized> KnowledgeBase for Arc<K> {
    async fn structured_query(
        &self,
        query: &EpisodeMatch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExternalId>> {
        (**self).structured_query(query, cancel).await
    }

    async fn ranked_search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchHit>> {
        (**self).ranked_search(query, cancel).await
    }

    async fn fetch_topic(
        &self,
        id: &ExternalId,
        cancel: &CancellationToken,
    ) -> Result<TopicRecord> {
        (**self).fetch_topic(id, cancel).await
    }
}
