use serde::{Deserialize, Serialize};

/// One search hit as returned by the backend.
///
/// Only `id` is required; the fallback endpoint returns much sparser records
/// than the primary one, so everything else is defaulted. Dates stay as the
/// backend formatted them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_type: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub date_published: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

impl DocumentSummary {
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            document_type: None,
            jurisdiction: None,
            court: None,
            date_published: None,
            confidence_score: None,
            source: None,
            snippet: None,
            relevance_score: None,
        }
    }
}
