// Re-export main components
pub mod api;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod history;
pub mod metrics;
pub mod monitoring;
pub mod orchestrator;
pub mod results;
pub mod storage;
pub mod suggest;

// Re-export commonly used types
pub use cache::SuggestionCache;
pub use config::ClientConfig;
pub use document::DocumentSummary;
pub use error::{GatewayError, GatewayResult};
pub use filter::{DateRange, SearchFilter};
pub use gateway::{ApiRequest, GatewayStats, HttpTransport, Method, RequestGateway, Transport};
pub use history::{HistoryEntry, SearchHistoryStore};
pub use metrics::{MetricsAggregator, SearchMetrics};
pub use monitoring::MonitoringClient;
pub use orchestrator::{SearchContext, SearchOrchestrator};
pub use results::{SearchOutcome, SearchResultPage};
pub use storage::Storage;
pub use suggest::{SuggestionLookup, SuggestionUpdate};

// Re-export error types
pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_opens_with_empty_state() -> Result<()> {
        let ctx = SearchContext::with_transport(
            ClientConfig::default(),
            std::sync::Arc::new(HttpTransport::new("http://127.0.0.1:9")),
            Storage::in_memory()?,
        )?;
        let search = SearchOrchestrator::new(ctx);

        assert!(search.history().is_empty());
        assert_eq!(search.metrics(), SearchMetrics::default());
        assert_eq!(search.gateway_stats().total_requests, 0);

        Ok(())
    }
}
