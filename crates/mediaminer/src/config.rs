use mediaminer_core::UpdateScope;
use mediaminer_core::update::{DEFAULT_DATA_SOURCE, DEFAULT_GRAPH};
use mediaminer_kb::KbConfig;

/// Configuration of a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinerConfig {
    /// Graph every assertion is written into.
    pub graph: String,
    /// Data source attached to every enriched subject.
    pub data_source: String,
    /// Knowledge-base client settings.
    pub kb: KbConfig,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            graph: DEFAULT_GRAPH.to_string(),
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            kb: KbConfig::default(),
        }
    }
}

impl MinerConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output graph.
    pub fn with_graph(mut self, graph: impl Into<String>) -> Self {
        self.graph = graph.into();
        self
    }

    /// Set the knowledge-base client settings.
    pub fn with_kb(mut self, kb: KbConfig) -> Self {
        self.kb = kb;
        self
    }

    /// The scope update batches are built with.
    pub fn scope(&self) -> UpdateScope {
        UpdateScope {
            graph: self.graph.clone(),
            data_source: self.data_source.clone(),
        }
    }
}
