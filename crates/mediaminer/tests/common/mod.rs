//! Scripted knowledge base shared by the pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mediaminer::{ExternalId, KnowledgeBase};
use mediaminer_core::extract::properties as prop;
use mediaminer_core::{TopicRecord, TopicValue};
use mediaminer_kb::{EpisodeMatch, KbError, SearchHit, SearchQuery};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
pub struct ScriptedKb {
    pub hits: HashMap<String, SearchHit>,
    pub episodes: HashMap<(String, u32, u32), ExternalId>,
    pub topics: HashMap<String, TopicRecord>,
    /// Searches for these titles fail with a transport error.
    pub broken: Vec<String>,
    /// Searches for these titles block until cancelled.
    pub stalled: Vec<String>,
    pub stalled_entered: Notify,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedKb {
    pub fn film(mut self, title: &str, id: &str, score: f64, topic: TopicRecord) -> Self {
        self.hits.insert(
            title.to_string(),
            SearchHit {
                id: Some(ExternalId::new(id)),
                name: Some(title.to_string()),
                score,
            },
        );
        self.topics.insert(id.to_string(), topic);
        self
    }

    pub fn episode(mut self, series: &str, season: u32, episode: u32, id: &str, topic: TopicRecord) -> Self {
        self.episodes
            .insert((series.to_string(), season, episode), ExternalId::new(id));
        self.topics.insert(id.to_string(), topic);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl KnowledgeBase for ScriptedKb {
    async fn structured_query(
        &self,
        query: &EpisodeMatch,
        _cancel: &CancellationToken,
    ) -> mediaminer_kb::Result<Vec<ExternalId>> {
        self.log(format!("mql:{}:{}:{}", query.series, query.season, query.episode));
        let key = (query.series.clone(), query.season, query.episode);
        Ok(self.episodes.get(&key).cloned().into_iter().collect())
    }

    async fn ranked_search(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> mediaminer_kb::Result<Vec<SearchHit>> {
        self.log(format!("search:{}", query.text));
        if self.broken.contains(&query.text) {
            return Err(KbError::Status {
                status: 503,
                url: "http://kb.test/search".into(),
            });
        }
        if self.stalled.contains(&query.text) {
            self.stalled_entered.notify_one();
            cancel.cancelled().await;
            return Err(KbError::Cancelled);
        }
        if cancel.is_cancelled() {
            return Err(KbError::Cancelled);
        }
        Ok(self.hits.get(&query.text).cloned().into_iter().collect())
    }

    async fn fetch_topic(
        &self,
        id: &ExternalId,
        cancel: &CancellationToken,
    ) -> mediaminer_kb::Result<TopicRecord> {
        self.log(format!("topic:{id}"));
        if cancel.is_cancelled() {
            return Err(KbError::Cancelled);
        }
        self.topics.get(id.as_str()).cloned().ok_or(KbError::Api {
            code: 404,
            message: format!("no topic {id}"),
        })
    }
}

pub fn named(name: &str) -> TopicRecord {
    TopicRecord::new(None).with(prop::NAME, TopicValue::Text(name.into()))
}

pub fn inception() -> TopicRecord {
    named("Inception")
        .with(prop::FILM_RELEASE_DATE, TopicValue::Timestamp(1_287_878_400))
        .with(
            prop::FILM_RATING,
            TopicValue::Reference {
                id: None,
                text: "PG-13".into(),
            },
        )
}
