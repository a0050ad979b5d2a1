//! # HTTP knowledge base
//!
//! [`KnowledgeBase`] over the Freebase-style JSON API: `mqlread` for
//! structured episode matches, `search` for ranked film lookups and `topic`
//! for full records.

use async_trait::async_trait;
use mediaminer_core::{ExternalId, TopicRecord};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::client::{EpisodeMatch, KnowledgeBase, SearchHit, SearchQuery};
use crate::config::KbConfig;
use crate::error::{KbError, Result};
use crate::wire::{ErrorEnvelope, MqlResponse, SearchResponse, TopicResponse};

/// Knowledge-base client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeBase {
    client: reqwest::Client,
    config: KbConfig,
}

impl HttpKnowledgeBase {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns `KbError::Network` if the HTTP client cannot be constructed.
    pub fn new(config: KbConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &KbConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(&'static str, String)>,
        cancel: &CancellationToken,
    ) -> Result<T> {
        if cancel.is_cancelled() {
            return Err(KbError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(KbError::Cancelled),
            result = self.send(path, params) => result,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T> {
        if let Some(key) = &self.config.api_key {
            params.push(("key", key.clone()));
        }

        let url = self.url(path);
        trace!(%url, "GET");
        let response = self.client.get(&url).query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) {
            return Err(KbError::Api {
                code: envelope.error.code.unwrap_or(status.as_u16()),
                message: envelope.error.message,
            });
        }
        if !status.is_success() {
            return Err(KbError::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    async fn structured_query(
        &self,
        query: &EpisodeMatch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExternalId>> {
        let mql = json!([{
            "id": null,
            "type": query.record_type,
            "series": query.series,
            "season_number": query.season,
            "episode_number": query.episode,
            "limit": 1,
        }]);
        debug!(series = %query.series, season = query.season, episode = query.episode, "mqlread");

        let response: MqlResponse = self
            .get_json("/mqlread", vec![("query", mql.to_string())], cancel)
            .await?;
        Ok(response.into_ids())
    }

    async fn ranked_search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<SearchHit>> {
        debug!(text = %query.text, record_type = %query.record_type, "search");
        let params = vec![
            ("query", query.text.clone()),
            ("filter", format!("(all type:{})", query.record_type)),
            ("limit", query.limit.to_string()),
            ("lang", self.config.language.clone()),
        ];

        let response: SearchResponse = self.get_json("/search", params, cancel).await?;
        Ok(response.into_hits())
    }

    async fn fetch_topic(
        &self,
        id: &ExternalId,
        cancel: &CancellationToken,
    ) -> Result<TopicRecord> {
        let id = id.as_str();
        let path = if id.starts_with('/') {
            format!("/topic{id}")
        } else {
            format!("/topic/{id}")
        };
        debug!(id, "topic");

        let response: TopicResponse = self
            .get_json(&path, vec![("lang", self.config.language.clone())], cancel)
            .await?;
        Ok(response.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let kb = HttpKnowledgeBase::new(KbConfig::new().with_base_url("http://localhost:1234/v1/")).unwrap();
        assert_eq!(kb.url("/search"), "http://localhost:1234/v1/search");
    }

    #[tokio::test]
    async fn pre_cancelled_token_short_circuits() {
        let kb = HttpKnowledgeBase::new(KbConfig::new().with_base_url("http://127.0.0.1:9")).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = kb
            .fetch_topic(&ExternalId::new("/m/0661ql3"), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, KbError::Cancelled));
    }
}
