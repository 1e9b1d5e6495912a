use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One project directory under the projects root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque on-disk directory name
    pub internal_id: String,
    /// Verified working directory, or the heuristic decode of `internal_id`
    pub display_path: String,
    pub project_name: String,
    pub url_safe_id: String,
    pub stats: ProjectStats,
    #[serde(skip)]
    pub project_dir: PathBuf,
}

/// Aggregate counts over every conversation file of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_messages: usize,
    pub assistant_messages: usize,
    pub user_messages: usize,
    pub conversation_count: usize,
    pub most_recent_activity: Option<DateTime<Utc>>,
}
