use mediaminer_core::{ExternalId, Result, TopicRecord};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::KnowledgeBase;

/// Retrieves full topic records. Nothing is cached; every call hits the service.
#[derive(Debug, Clone)]
pub struct Fetcher<K> {
    kb: K,
}

impl<K: KnowledgeBase> Fetcher<K> {
    /// Creates a fetcher over `kb`.
    pub fn new(kb: K) -> Self {
        Self { kb }
    }

    /// Fetches the record for `id`.
    ///
    /// # Errors
    ///
    /// `MinerError::Service` (or `Cancelled`) naming `id` when the call fails.
    pub async fn fetch(&self, id: &ExternalId, cancel: &CancellationToken) -> Result<TopicRecord> {
        let record = self
            .kb
            .fetch_topic(id, cancel)
            .await
            .map_err(|e| e.into_miner(format!("fetching topic {id}")))?;
        debug!(%id, properties = record.property_names().count(), "fetched topic");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use mediaminer_core::{ErrorKind, TopicValue};

    use super::*;
    use crate::client::{EpisodeMatch, SearchHit, SearchQuery};
    use crate::error::KbError;

    #[derive(Default)]
    struct Topics {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl KnowledgeBase for Topics {
        async fn structured_query(
            &self,
            _query: &EpisodeMatch,
            _cancel: &CancellationToken,
        ) -> crate::Result<Vec<ExternalId>> {
            unreachable!()
        }

        async fn ranked_search(
            &self,
            _query: &SearchQuery,
            _cancel: &CancellationToken,
        ) -> crate::Result<Vec<SearchHit>> {
            unreachable!()
        }

        async fn fetch_topic(
            &self,
            id: &ExternalId,
            _cancel: &CancellationToken,
        ) -> crate::Result<TopicRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id.as_str() == "/m/missing" {
                return Err(KbError::Api {
                    code: 404,
                    message: "Not Found".into(),
                });
            }
            Ok(TopicRecord::new(Some(id.to_string()))
                .with("/type/object/name", TopicValue::Text("Inception".into())))
        }
    }

    #[tokio::test]
    async fn fetches_every_time() {
        let fetcher = Fetcher::new(std::sync::Arc::new(Topics::default()));
        let id = ExternalId::new("/m/0661ql3");
        let cancel = CancellationToken::new();

        let first = fetcher.fetch(&id, &cancel).await.unwrap();
        let second = fetcher.fetch(&id, &cancel).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.text("/type/object/name", 0), Some("Inception"));
        assert_eq!(fetcher.kb.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_names_the_id() {
        let fetcher = Fetcher::new(Topics::default());
        let err = fetcher
            .fetch(&ExternalId::new("/m/missing"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.to_string().contains("/m/missing"));
    }
}
