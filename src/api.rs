//! Wire contract of the search backend.
//!
//! Request bodies here are the only place the client decides what goes on the
//! wire, so filter pruning happens in [`WireFilter::from_filter`].

use crate::document::DocumentSummary;
use crate::filter::SearchFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ========== Endpoints ==========

pub const ULTRA_SEARCH: &str = "/api/ultra-search";
pub const FALLBACK_SEARCH: &str = "/api/search";
pub const SEARCH_SUGGESTIONS: &str = "/api/search-suggestions";
pub const SOURCE_HEALTH: &str = "/api/source-health";
pub const SYSTEM_STATUS: &str = "/api/system-status";
pub const SEARCH_PATTERNS: &str = "/api/analytics/search-patterns";

// ========== Request Types ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicFilter {
    pub jurisdictions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireDateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_citation_count: Option<u32>,
}

/// Filter in the backend's shape. Absent fields are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WireFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geographic: Option<GeographicFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courts: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_ranges: Option<Vec<WireDateRange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

fn non_empty<'a, I>(values: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

impl WireFilter {
    pub fn from_filter(filter: &SearchFilter) -> Self {
        let query = filter.trimmed_query();
        let query_text = (!query.is_empty()).then(|| query.to_string());

        let geographic =
            non_empty(&filter.jurisdictions).map(|jurisdictions| GeographicFilter { jurisdictions });

        let date_ranges = filter
            .date_range
            .as_ref()
            .filter(|range| !range.is_open())
            .map(|range| {
                vec![WireDateRange {
                    start_date: range.start,
                    end_date: range.end,
                }]
            });

        let quality = if filter.min_confidence_score.is_some() || filter.min_citation_count.is_some() {
            Some(QualityFilter {
                min_confidence_score: filter.min_confidence_score,
                min_citation_count: filter.min_citation_count,
            })
        } else {
            None
        };

        Self {
            query_text,
            document_types: non_empty(&filter.document_types),
            geographic,
            courts: non_empty(&filter.courts),
            date_ranges,
            quality,
            sources: non_empty(&filter.sources),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UltraSearchRequest {
    #[serde(flatten)]
    pub filter: WireFilter,
    pub page: u32,
    pub per_page: u32,
}

impl UltraSearchRequest {
    pub fn new(filter: &SearchFilter, page: u32, per_page: u32) -> Self {
        Self {
            filter: WireFilter::from_filter(filter),
            page,
            per_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackSearchRequest {
    pub query: String,
    pub page: u32,
    pub limit: u32,
}

// ========== Response Types ==========

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTypeShare {
    #[serde(default)]
    pub document_type: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityBucket {
    #[serde(default)]
    pub quality_range: String,
    #[serde(default)]
    pub document_count: u64,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub average_confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UltraSearchResponse {
    pub documents: Vec<DocumentSummary>,
    pub total_count: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_next_page: Option<bool>,
    #[serde(default)]
    pub search_id: Option<String>,
    #[serde(default)]
    pub execution_time_ms: f64,
    #[serde(default)]
    pub jurisdictions_covered: Vec<String>,
    #[serde(default)]
    pub sources_searched: Vec<String>,
    #[serde(default)]
    pub document_type_distribution: Vec<DocumentTypeShare>,
    #[serde(default)]
    pub quality_distribution: Vec<QualityBucket>,
    #[serde(default)]
    pub suggested_refinements: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FallbackSearchResponse {
    #[serde(default)]
    pub documents: Vec<DocumentSummary>,
    #[serde(default)]
    pub total_count: u64,
}

/// A suggestion item. Older backends send bare strings, newer ones send
/// `{suggestion, type, confidence, ...}` objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SuggestionItem {
    Text(String),
    Detailed { suggestion: String },
}

impl SuggestionItem {
    pub fn into_text(self) -> String {
        match self {
            SuggestionItem::Text(text) => text,
            SuggestionItem::Detailed { suggestion } => suggestion,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub suggestions: Vec<SuggestionItem>,
}
