use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line matching a search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub project_display_name: String,
    pub project_internal_id: String,
    pub conversation_session_id: String,
    pub filename: String,
    /// 1-based index among the file's non-blank lines
    pub line_number: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub message_type: Option<String>,
    pub preview_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}
