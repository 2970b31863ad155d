use crate::api::{
    self, FallbackSearchRequest, FallbackSearchResponse, SuggestionItem, SuggestionsResponse,
    UltraSearchRequest, UltraSearchResponse,
};
use crate::cache::SuggestionCache;
use crate::config::ClientConfig;
use crate::error::GatewayResult;
use crate::filter::SearchFilter;
use crate::gateway::{ApiRequest, GatewayStats, HttpTransport, RequestGateway, Transport};
use crate::history::{HistoryEntry, SearchHistoryStore};
use crate::metrics::{MetricsAggregator, SearchMetrics};
use crate::monitoring::MonitoringClient;
use crate::results::{SearchOutcome, SearchResultPage};
use crate::storage::Storage;
use crate::suggest::{merge_suggestions, DebounceSlot, SuggestionLookup, SuggestionUpdate};
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Instant;
use unicode_segmentation::UnicodeSegmentation;

/// Shortest query text that is sent to the backend
pub const MIN_QUERY_CHARS: usize = 2;

/// Process-wide client state, built once and owned by the orchestrator.
pub struct SearchContext {
    config: ClientConfig,
    gateway: Arc<RequestGateway>,
    suggestions: Mutex<SuggestionCache>,
    history: Mutex<SearchHistoryStore>,
    metrics: Mutex<MetricsAggregator>,
}

impl SearchContext {
    /// Context talking HTTP to `config.base_url`, with state under
    /// `config.data_dir` (in memory when unset).
    pub fn open(config: ClientConfig) -> Result<Self> {
        let storage = match &config.data_dir {
            Some(dir) => Storage::open(dir)?,
            None => Storage::in_memory()?,
        };
        let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
        Self::with_transport(config, transport, storage)
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        storage: Storage,
    ) -> Result<Self> {
        let gateway = RequestGateway::new(transport, config.request_timeout, config.latency_window);
        let history = SearchHistoryStore::load(storage.clone(), config.history_capacity)?;
        let metrics = MetricsAggregator::load(storage, config.metrics_window)?;

        tracing::info!(
            history_entries = history.len(),
            total_searches = metrics.snapshot().total_searches,
            "Loaded client state"
        );

        Ok(Self {
            suggestions: Mutex::new(SuggestionCache::new(config.suggestion_cache_capacity)),
            gateway: Arc::new(gateway),
            history: Mutex::new(history),
            metrics: Mutex::new(metrics),
            config,
        })
    }
}

#[derive(Default)]
struct DisplayState {
    current: Option<SearchOutcome>,
    last_filter: Option<SearchFilter>,
    in_flight: usize,
}

struct Inner {
    ctx: SearchContext,
    display: Mutex<DisplayState>,
    debounce: DebounceSlot,
    suggestion_tx: watch::Sender<SuggestionUpdate>,
}

/// Decrements the in-flight count even if the search future is dropped
struct InFlight<'a>(&'a Mutex<DisplayState>);

impl<'a> InFlight<'a> {
    fn start(display: &'a Mutex<DisplayState>) -> Self {
        display.lock().in_flight += 1;
        Self(display)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut display = self.0.lock();
        display.in_flight = display.in_flight.saturating_sub(1);
    }
}

/// Coordinates searches, suggestions, history and telemetry.
///
/// Cheap to clone; clones share one [`SearchContext`]. Overlapping searches
/// are all allowed to finish and whichever completes last becomes
/// [`current`](Self::current).
#[derive(Clone)]
pub struct SearchOrchestrator {
    inner: Arc<Inner>,
}

impl SearchOrchestrator {
    pub fn new(ctx: SearchContext) -> Self {
        let debounce = DebounceSlot::new(ctx.config.suggestion_debounce);
        let (suggestion_tx, _) = watch::channel(SuggestionUpdate::default());
        Self {
            inner: Arc::new(Inner {
                ctx,
                display: Mutex::new(DisplayState::default()),
                debounce,
                suggestion_tx,
            }),
        }
    }

    pub fn open(config: ClientConfig) -> Result<Self> {
        Ok(Self::new(SearchContext::open(config)?))
    }

    fn ctx(&self) -> &SearchContext {
        &self.inner.ctx
    }

    // ========== Search ==========

    /// Run a search. Returns `None` without touching the network when the
    /// query is shorter than [`MIN_QUERY_CHARS`].
    pub async fn search(&self, filter: SearchFilter, page: u32) -> Option<SearchOutcome> {
        if filter.trimmed_query().graphemes(true).count() < MIN_QUERY_CHARS {
            tracing::debug!(query = %filter.query, "Query too short, not dispatching");
            return None;
        }

        let page = page.max(1);
        self.inner.display.lock().last_filter = Some(filter.clone());

        let outcome = {
            let _in_flight = InFlight::start(&self.inner.display);
            self.dispatch(&filter, page).await
        };

        self.inner.display.lock().current = Some(outcome.clone());
        Some(outcome)
    }

    /// Re-run the most recent search at another page
    pub async fn go_to_page(&self, page: u32) -> Option<SearchOutcome> {
        let filter = self.inner.display.lock().last_filter.clone()?;
        self.search(filter, page).await
    }

    async fn dispatch(&self, filter: &SearchFilter, page: u32) -> SearchOutcome {
        let per_page = self.ctx().config.per_page;
        let query = filter.trimmed_query();
        let started = Instant::now();

        // Pagination also goes in the query string, where the backend reads it
        let primary = match ApiRequest::post(api::ULTRA_SEARCH, &UltraSearchRequest::new(filter, page, per_page)) {
            Ok(request) => {
                let request = request.with_query("page", page).with_query("per_page", per_page);
                self.ctx().gateway.execute::<UltraSearchResponse>(request).await
            }
            Err(err) => Err(err),
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        match primary {
            Ok(response) => {
                let result = SearchResultPage::from_primary(response, page, per_page);
                self.record_attempt(elapsed_ms, true);
                if page == 1 {
                    self.record_history(query, filter, result.total_count, elapsed_ms);
                }
                tracing::info!(
                    query,
                    page,
                    total = result.total_count,
                    elapsed_ms,
                    "Search completed"
                );
                SearchOutcome::Primary(result)
            }
            Err(err) => {
                tracing::warn!(query, page, error = %err, "Primary search failed, trying fallback");
                // Recorded as a failure whatever the fallback returns
                self.record_attempt(elapsed_ms, false);

                match self.fallback_search(query, page, per_page).await {
                    Ok(result) => {
                        tracing::info!(query, page, total = result.total_count, "Fallback search completed");
                        SearchOutcome::Degraded(result)
                    }
                    Err(err) => {
                        tracing::error!(query, page, error = %err, "Fallback search failed");
                        SearchOutcome::Empty(SearchResultPage::empty(page, per_page))
                    }
                }
            }
        }
    }

    /// Query-only search against the fallback endpoint. Unlike [`search`],
    /// failures are returned to the caller.
    ///
    /// [`search`]: Self::search
    pub async fn fallback_search(&self, query: &str, page: u32, limit: u32) -> GatewayResult<SearchResultPage> {
        let body = FallbackSearchRequest {
            query: query.trim().to_string(),
            page,
            limit,
        };
        let request = ApiRequest::post(api::FALLBACK_SEARCH, &body)?;
        let response: FallbackSearchResponse = self.ctx().gateway.execute(request).await?;
        Ok(SearchResultPage::from_fallback(response, page, limit))
    }

    fn record_attempt(&self, elapsed_ms: f64, success: bool) {
        if let Err(err) = self.ctx().metrics.lock().record(elapsed_ms, success) {
            tracing::error!(error = %err, "Failed to persist search metrics");
        }
    }

    fn record_history(&self, query: &str, filter: &SearchFilter, result_count: u64, elapsed_ms: f64) {
        if let Err(err) = self
            .ctx()
            .history
            .lock()
            .record(query, filter, result_count, elapsed_ms)
        {
            tracing::error!(error = %err, "Failed to persist search history");
        }
    }

    // ========== Suggestions ==========

    /// Suggestions for `prefix`.
    ///
    /// An exact cache hit is returned immediately. Anything else arms the
    /// debounce timer, replacing whatever prefix was armed before, and the
    /// result is published to [`subscribe_suggestions`](Self::subscribe_suggestions).
    pub fn get_suggestions(&self, prefix: &str) -> SuggestionLookup {
        if prefix.trim().is_empty() {
            self.inner.debounce.cancel();
            return SuggestionLookup::Ready(Vec::new());
        }

        if let Some(cached) = self.ctx().suggestions.lock().get(prefix) {
            return SuggestionLookup::Ready(cached.clone());
        }

        let this = self.clone();
        let prefix = prefix.to_string();
        self.inner.debounce.arm(async move {
            this.fetch_suggestions(prefix).await;
        });
        SuggestionLookup::Pending
    }

    pub fn subscribe_suggestions(&self) -> watch::Receiver<SuggestionUpdate> {
        self.inner.suggestion_tx.subscribe()
    }

    async fn fetch_suggestions(&self, prefix: String) {
        let config = &self.ctx().config;
        let request = ApiRequest::get(api::SEARCH_SUGGESTIONS)
            .with_query("query", prefix.trim())
            .with_query("limit", config.suggestion_fetch_limit);

        let suggestions = match self.ctx().gateway.execute::<SuggestionsResponse>(request).await {
            Ok(response) => {
                let backend = response
                    .suggestions
                    .into_iter()
                    .map(SuggestionItem::into_text)
                    .collect();
                let recent = self
                    .ctx()
                    .history
                    .lock()
                    .matching(&prefix, config.history_capacity);

                let merged = merge_suggestions(
                    backend,
                    recent,
                    config.history_suggestions,
                    config.max_suggestions,
                );
                self.ctx().suggestions.lock().put(prefix.clone(), merged.clone());
                merged
            }
            Err(err) => {
                tracing::warn!(prefix = %prefix, error = %err, "Suggestion fetch failed");
                Vec::new()
            }
        };

        self.inner.suggestion_tx.send_replace(SuggestionUpdate {
            query: prefix,
            suggestions,
        });
    }

    // ========== State Accessors ==========

    /// Most recently completed outcome
    pub fn current(&self) -> Option<SearchOutcome> {
        self.inner.display.lock().current.clone()
    }

    pub fn in_flight(&self) -> usize {
        self.inner.display.lock().in_flight
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.ctx().history.lock().entries().to_vec()
    }

    /// Erase history, and the cached suggestions that were merged from it
    pub fn clear_history(&self) -> Result<()> {
        self.ctx().history.lock().clear()?;
        self.ctx().suggestions.lock().clear();
        Ok(())
    }

    pub fn metrics(&self) -> SearchMetrics {
        self.ctx().metrics.lock().snapshot()
    }

    pub fn gateway_stats(&self) -> GatewayStats {
        self.ctx().gateway.stats()
    }

    pub fn cached_suggestions(&self) -> usize {
        self.ctx().suggestions.lock().len()
    }

    pub fn monitoring(&self) -> MonitoringClient {
        MonitoringClient::new(self.ctx().gateway.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;

    #[derive(Clone, Copy, PartialEq)]
    enum Reply {
        Ok,
        Fail,
    }

    struct Scripted {
        primary: Mutex<Reply>,
        fallback: Mutex<Reply>,
        suggestions: Mutex<Reply>,
        suggestion_list: Vec<String>,
        suggestion_delay_ms: u64,
        primary_delay_ms: u64,
        fallback_delay_ms: u64,
        query_delay_ms: HashMap<String, u64>,
        calls: Mutex<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                primary: Mutex::new(Reply::Ok),
                fallback: Mutex::new(Reply::Ok),
                suggestions: Mutex::new(Reply::Ok),
                suggestion_list: Vec::new(),
                suggestion_delay_ms: 0,
                primary_delay_ms: 10,
                fallback_delay_ms: 10,
                query_delay_ms: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_primary(self) -> Self {
            *self.primary.lock() = Reply::Fail;
            self
        }

        fn failing_fallback(self) -> Self {
            *self.fallback.lock() = Reply::Fail;
            self
        }

        fn calls_to(&self, endpoint: &str) -> Vec<ApiRequest> {
            self.calls
                .lock()
                .iter()
                .filter(|call| call.endpoint == endpoint)
                .cloned()
                .collect()
        }

        fn unavailable() -> GatewayError {
            GatewayError::Status {
                status: 503,
                body: "down".to_string(),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&self, request: &ApiRequest) -> Result<Value, GatewayError> {
            self.calls.lock().push(request.clone());
            let body = request.body.clone().unwrap_or(Value::Null);

            match request.endpoint.as_str() {
                api::ULTRA_SEARCH => {
                    let query = body["query_text"].as_str().unwrap_or_default().to_string();
                    let delay = self.query_delay_ms.get(&query).copied().unwrap_or(self.primary_delay_ms);
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    if *self.primary.lock() == Reply::Fail {
                        return Err(Self::unavailable());
                    }
                    Ok(json!({
                        "documents": [{"id": "p1", "title": query}],
                        "total_count": 120,
                        "page": body["page"],
                        "per_page": body["per_page"],
                        "total_pages": 3,
                        "has_next_page": true,
                        "search_id": "search-1",
                        "execution_time_ms": 4.0
                    }))
                }
                api::FALLBACK_SEARCH => {
                    tokio::time::sleep(Duration::from_millis(self.fallback_delay_ms)).await;
                    if *self.fallback.lock() == Reply::Fail {
                        return Err(Self::unavailable());
                    }
                    Ok(json!({"documents": [{"id": "f1", "title": "fallback"}], "total_count": 1}))
                }
                api::SEARCH_SUGGESTIONS => {
                    tokio::time::sleep(Duration::from_millis(self.suggestion_delay_ms)).await;
                    if *self.suggestions.lock() == Reply::Fail {
                        return Err(Self::unavailable());
                    }
                    if !self.suggestion_list.is_empty() {
                        return Ok(json!({"suggestions": self.suggestion_list}));
                    }
                    let query = request.query_value("query").unwrap_or_default();
                    Ok(json!({"suggestions": [format!("{} law", query)]}))
                }
                _ => Ok(json!({})),
            }
        }
    }

    fn orchestrator(transport: Arc<Scripted>) -> SearchOrchestrator {
        let ctx = SearchContext::with_transport(
            ClientConfig::default(),
            transport,
            Storage::in_memory().unwrap(),
        )
        .unwrap();
        SearchOrchestrator::new(ctx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_or_blank_query_never_calls_backend() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());

        assert!(search.search(SearchFilter::new(""), 1).await.is_none());
        assert!(search.search(SearchFilter::new("   "), 1).await.is_none());
        assert!(search.search(SearchFilter::new(" a "), 1).await.is_none());

        assert!(transport.calls.lock().is_empty());
        assert_eq!(search.metrics().total_searches, 0);
        assert!(search.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_success_records_history_and_metrics() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());

        let outcome = search
            .search(SearchFilter::new("contract law").with_jurisdiction("United States"), 1)
            .await
            .unwrap();

        assert!(matches!(outcome, SearchOutcome::Primary(_)));
        assert_eq!(outcome.page().total_count, 120);
        assert_eq!(search.current(), Some(outcome));

        let history = search.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query, "contract law");
        assert_eq!(history[0].result_count, 120);

        let metrics = search.metrics();
        assert_eq!(metrics.total_searches, 1);
        assert_eq!(metrics.successful_searches, 1);

        let calls = transport.calls_to(api::ULTRA_SEARCH);
        let body = calls[0].body.as_ref().unwrap();
        assert_eq!(body["geographic"]["jurisdictions"], json!(["United States"]));
        assert!(body.get("courts").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_results_still_record_failure() {
        let transport = Arc::new(Scripted::new().failing_primary());
        let search = orchestrator(transport.clone());

        let outcome = search
            .search(SearchFilter::new("negligence").with_court("Court of Appeal"), 1)
            .await
            .unwrap();

        match &outcome {
            SearchOutcome::Degraded(page) => {
                assert_eq!(page.documents[0].id, "f1");
                assert_eq!(page.total_count, 1);
            }
            other => panic!("expected degraded outcome, got {}", other.kind()),
        }

        let metrics = search.metrics();
        assert_eq!(metrics.total_searches, 1);
        assert_eq!(metrics.successful_searches, 0);
        assert!(search.history().is_empty());

        let fallback = transport.calls_to(api::FALLBACK_SEARCH);
        assert_eq!(fallback.len(), 1);
        assert_eq!(
            fallback[0].body,
            Some(json!({"query": "negligence", "page": 1, "limit": 50}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_total_failure_yields_empty_page() {
        let transport = Arc::new(Scripted::new().failing_primary().failing_fallback());
        let search = orchestrator(transport);

        let outcome = search.search(SearchFilter::new("tort reform"), 2).await.unwrap();

        assert_eq!(outcome, SearchOutcome::Empty(SearchResultPage::empty(2, 50)));
        assert_eq!(outcome.page().total_pages, 0);
        assert_eq!(search.metrics().successful_searches, 0);
        assert_eq!(search.metrics().total_searches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_metrics_use_primary_elapsed_time() {
        let mut script = Scripted::new().failing_primary();
        script.primary_delay_ms = 100;
        script.fallback_delay_ms = 900;
        let search = orchestrator(Arc::new(script));

        search.search(SearchFilter::new("due process"), 1).await.unwrap();

        let last = search.metrics().last_execution_time_ms;
        assert!((100.0..110.0).contains(&last), "recorded {}", last);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pages_after_first_skip_history() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());

        assert!(search.go_to_page(2).await.is_none());

        search.search(SearchFilter::new("antitrust"), 1).await.unwrap();
        let outcome = search.go_to_page(3).await.unwrap();

        assert_eq!(outcome.page().page, 3);
        assert_eq!(search.history().len(), 1);
        assert_eq!(search.metrics().total_searches, 2);

        let calls = transport.calls_to(api::ULTRA_SEARCH);
        assert_eq!(calls[1].body.as_ref().unwrap()["query_text"], "antitrust");
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_completed_search_wins_display() {
        let mut script = Scripted::new();
        script.query_delay_ms.insert("slow query".to_string(), 500);
        script.query_delay_ms.insert("fast query".to_string(), 50);
        let search = orchestrator(Arc::new(script));

        let (slow, fast) = tokio::join!(
            search.search(SearchFilter::new("slow query"), 1),
            search.search(SearchFilter::new("fast query"), 1),
        );

        assert!(slow.is_some() && fast.is_some());
        let current = search.current().unwrap();
        assert_eq!(current.page().documents[0].title, "slow query");
        assert_eq!(search.in_flight(), 0);
        assert_eq!(search.history()[0].query, "slow query");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_prefixes_send_only_the_last() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());
        let mut updates = search.subscribe_suggestions();

        for prefix in ["c", "co", "con", "cont"] {
            assert_eq!(search.get_suggestions(prefix), SuggestionLookup::Pending);
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        updates.changed().await.unwrap();
        let update = updates.borrow_and_update().clone();
        assert_eq!(update.query, "cont");
        assert_eq!(update.suggestions, vec!["cont law"]);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let calls = transport.calls_to(api::SEARCH_SUGGESTIONS);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query_value("query"), Some("cont"));

        // Now cached: answered immediately, nothing new sent
        assert_eq!(
            search.get_suggestions("cont"),
            SuggestionLookup::Ready(vec!["cont law".to_string()])
        );
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(transport.calls_to(api::SEARCH_SUGGESTIONS).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestions_merge_recent_queries() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport);
        for query in ["contract damages", "breach of contract", "tort", "contract formation", "void contract"] {
            search.search(SearchFilter::new(query), 1).await.unwrap();
        }
        let mut updates = search.subscribe_suggestions();

        search.get_suggestions("contract");
        updates.changed().await.unwrap();

        let suggestions = updates.borrow().suggestions.clone();
        assert_eq!(
            suggestions,
            vec!["contract law", "void contract", "contract formation", "breach of contract"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_recent_query_already_suggested_does_not_use_a_slot() {
        let mut script = Scripted::new();
        script.suggestion_list = vec!["contract law".to_string()];
        let search = orchestrator(Arc::new(script));
        for query in ["contract c", "contract b", "contract a", "contract law"] {
            search.search(SearchFilter::new(query), 1).await.unwrap();
        }
        let mut updates = search.subscribe_suggestions();

        search.get_suggestions("contract");
        updates.changed().await.unwrap();

        assert_eq!(
            updates.borrow().suggestions,
            vec!["contract law", "contract a", "contract b", "contract c"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_after_timer_fired_keeps_running_fetch() {
        let mut script = Scripted::new();
        script.suggestion_delay_ms = 500;
        let transport = Arc::new(script);
        let search = orchestrator(transport.clone());

        search.get_suggestions("con");
        // Timer has fired and the "con" fetch is waiting on the backend
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.get_suggestions("cont");
        tokio::time::sleep(Duration::from_secs(2)).await;

        let calls = transport.calls_to(api::SEARCH_SUGGESTIONS);
        assert_eq!(calls.len(), 2);
        let stats = search.gateway_stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.successful_requests, 2);
        assert_eq!(search.cached_suggestions(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_history_drops_cached_suggestions() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());
        search.search(SearchFilter::new("contract damages"), 1).await.unwrap();
        let mut updates = search.subscribe_suggestions();

        search.get_suggestions("contract");
        updates.changed().await.unwrap();
        assert_eq!(search.cached_suggestions(), 1);

        search.clear_history().unwrap();

        assert!(search.history().is_empty());
        assert_eq!(search.cached_suggestions(), 0);
        assert_eq!(search.get_suggestions("contract"), SuggestionLookup::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_failure_publishes_empty_and_skips_cache() {
        let transport = Arc::new(Scripted::new());
        *transport.suggestions.lock() = Reply::Fail;
        let search = orchestrator(transport.clone());
        let mut updates = search.subscribe_suggestions();

        search.get_suggestions("habeas");
        updates.changed().await.unwrap();

        assert!(updates.borrow().suggestions.is_empty());
        assert_eq!(search.cached_suggestions(), 0);
        assert_eq!(search.get_suggestions("habeas"), SuggestionLookup::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_prefix_cancels_pending_fetch() {
        let transport = Arc::new(Scripted::new());
        let search = orchestrator(transport.clone());

        search.get_suggestions("tre");
        assert_eq!(search.get_suggestions(" "), SuggestionLookup::Ready(Vec::new()));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(transport.calls_to(api::SEARCH_SUGGESTIONS).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_direct_fallback_propagates_errors() {
        let transport = Arc::new(Scripted::new().failing_fallback());
        let search = orchestrator(transport);

        let err = search.fallback_search("liability", 1, 20).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 503, .. }));
    }
}
