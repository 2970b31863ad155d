use crate::api::{
    DocumentTypeShare, FallbackSearchResponse, QualityBucket, UltraSearchResponse,
};
use crate::document::DocumentSummary;
use serde::Serialize;

/// Auxiliary analytics attached to a primary result page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchAnalytics {
    pub jurisdictions_covered: Vec<String>,
    pub sources_searched: Vec<String>,
    pub document_type_distribution: Vec<DocumentTypeShare>,
    pub quality_distribution: Vec<QualityBucket>,
    pub suggested_refinements: Vec<serde_json::Value>,
}

/// One page of results, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultPage {
    pub documents: Vec<DocumentSummary>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub search_id: Option<String>,
    pub execution_time_ms: f64,
    pub analytics: SearchAnalytics,
}

fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as u64).min(u32::MAX as u64) as u32
}

impl SearchResultPage {
    /// Well-formed page with no results and no pages
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            documents: Vec::new(),
            total_count: 0,
            page,
            per_page,
            total_pages: 0,
            has_next_page: false,
            search_id: None,
            execution_time_ms: 0.0,
            analytics: SearchAnalytics::default(),
        }
    }

    pub fn from_primary(response: UltraSearchResponse, page: u32, per_page: u32) -> Self {
        let page = response.page.unwrap_or(page);
        let per_page = response.per_page.unwrap_or(per_page);
        let total_pages = response
            .total_pages
            .unwrap_or_else(|| page_count(response.total_count, per_page));

        Self {
            documents: response.documents,
            total_count: response.total_count,
            page,
            per_page,
            total_pages,
            has_next_page: response.has_next_page.unwrap_or(page < total_pages),
            search_id: response.search_id,
            execution_time_ms: response.execution_time_ms,
            analytics: SearchAnalytics {
                jurisdictions_covered: response.jurisdictions_covered,
                sources_searched: response.sources_searched,
                document_type_distribution: response.document_type_distribution,
                quality_distribution: response.quality_distribution,
                suggested_refinements: response.suggested_refinements,
            },
        }
    }

    pub fn from_fallback(response: FallbackSearchResponse, page: u32, limit: u32) -> Self {
        let total_pages = page_count(response.total_count, limit);
        Self {
            documents: response.documents,
            total_count: response.total_count,
            page,
            per_page: limit,
            total_pages,
            has_next_page: page < total_pages,
            search_id: None,
            execution_time_ms: 0.0,
            analytics: SearchAnalytics::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// How a search ended.
///
/// All three variants carry a displayable page. `Empty` is what a dead backend
/// produces, and its page is indistinguishable from a genuine zero-match page.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Full-featured results from the primary endpoint
    Primary(SearchResultPage),
    /// Query-only results from the fallback endpoint
    Degraded(SearchResultPage),
    /// Both endpoints failed
    Empty(SearchResultPage),
}

impl SearchOutcome {
    pub fn page(&self) -> &SearchResultPage {
        match self {
            SearchOutcome::Primary(page)
            | SearchOutcome::Degraded(page)
            | SearchOutcome::Empty(page) => page,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::Primary(_) => "primary",
            SearchOutcome::Degraded(_) => "degraded",
            SearchOutcome::Empty(_) => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_page_has_no_pages() {
        assert!(SearchResultPage::empty(1, 50).is_empty());

        let page = SearchResultPage::empty(3, 50);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 3);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_fallback_page_derives_pagination() {
        let response: FallbackSearchResponse = serde_json::from_value(json!({
            "documents": [{"id": "a"}, {"id": "b"}],
            "total_count": 101
        }))
        .unwrap();

        let page = SearchResultPage::from_fallback(response, 1, 50);
        assert_eq!(page.documents[0], DocumentSummary::new("a".to_string(), String::new()));
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);
        assert_eq!(page.documents.len(), 2);
    }

    #[test]
    fn test_primary_page_keeps_backend_pagination() {
        let response: UltraSearchResponse = serde_json::from_value(json!({
            "documents": [{"id": "a", "title": "A"}],
            "total_count": 1,
            "page": 1,
            "per_page": 50,
            "total_pages": 1,
            "has_next_page": false,
            "search_id": "s-1",
            "execution_time_ms": 12.5,
            "jurisdictions_covered": ["United States"]
        }))
        .unwrap();

        let page = SearchResultPage::from_primary(response, 1, 50);
        assert_eq!(page.search_id.as_deref(), Some("s-1"));
        assert_eq!(page.analytics.jurisdictions_covered, vec!["United States"]);
        assert_eq!(page.execution_time_ms, 12.5);
    }
}
