//! # Mediaminer KB
//!
//! Knowledge-base access for the video metadata miner. The
//! [`KnowledgeBase`] trait names the three remote operations the pipeline
//! needs; [`HttpKnowledgeBase`] implements them over a Freebase-style JSON
//! API. [`Resolver`] and [`Fetcher`] sit on top of any implementation.
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod resolver;
mod wire;

pub use client::{EpisodeMatch, KnowledgeBase, SearchHit, SearchQuery};
pub use config::KbConfig;
pub use error::{KbError, Result};
pub use fetcher::Fetcher;
pub use http::HttpKnowledgeBase;
pub use resolver::{Resolver, SCORE_THRESHOLD};
