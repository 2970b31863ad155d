use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Publication date window. Either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// User-selected search criteria, as collected by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub jurisdictions: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub document_types: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_citation_count: Option<u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub courts: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sources: BTreeSet<String>,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_jurisdiction(mut self, jurisdiction: impl Into<String>) -> Self {
        self.jurisdictions.insert(jurisdiction.into());
        self
    }

    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_types.insert(document_type.into());
        self
    }

    pub fn with_court(mut self, court: impl Into<String>) -> Self {
        self.courts.insert(court.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_min_confidence(mut self, score: f64) -> Self {
        self.min_confidence_score = Some(score);
        self
    }

    pub fn with_min_citations(mut self, count: u32) -> Self {
        self.min_citation_count = Some(count);
        self
    }

    /// Query text with surrounding whitespace removed
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }
}
