use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Listing entry for one conversation file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub filename: String,
    pub session_id: String,
    pub url_safe_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub git_branch: Option<String>,
    #[serde(default)]
    pub short_summary: Option<String>,
    pub size_bytes: u64,
}

/// Every record of one conversation file that parsed, in line order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    pub filename: String,
    pub message_count: usize,
    pub messages: Vec<Value>,
}
