use chrono::{DateTime, Utc};

use crate::models::ProjectStats;
use crate::parsers::ConversationFile;
use crate::parsers::records::{is_summary, record_timestamp, record_type};

const RECORD_TYPE_USER: &str = "user";
const RECORD_TYPE_ASSISTANT: &str = "assistant";

/// Counts and latest activity of a single conversation file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStats {
    pub total_messages: usize,
    pub assistant_messages: usize,
    pub user_messages: usize,
    pub most_recent_activity: Option<DateTime<Utc>>,
}

impl FileStats {
    /// Count the messages of a loaded file
    ///
    /// Summary records are not messages and contribute neither to the counts nor to the
    /// activity timestamp. The file's modification time seeds the activity timestamp and
    /// is overtaken by any later record timestamp.
    pub fn from_file(file: &ConversationFile) -> Self {
        let mut stats = FileStats { most_recent_activity: file.modified, ..Default::default() };

        for record in file.records.iter().filter(|record| !is_summary(record)) {
            stats.total_messages += 1;
            match record_type(record) {
                Some(RECORD_TYPE_ASSISTANT) => stats.assistant_messages += 1,
                Some(RECORD_TYPE_USER) => stats.user_messages += 1,
                _ => {}
            }
            stats.most_recent_activity =
                latest(stats.most_recent_activity, record_timestamp(record));
        }

        stats
    }
}

fn latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Fold per-file stats into project stats
///
/// Every file passed in counts as one conversation; files skipped for size or read errors
/// must simply not be passed. No files yields all-zero counts and no activity.
pub fn aggregate<I>(files: I) -> ProjectStats
where
    I: IntoIterator<Item = FileStats>,
{
    files.into_iter().fold(ProjectStats::default(), |mut project, file| {
        project.total_messages += file.total_messages;
        project.assistant_messages += file.assistant_messages;
        project.user_messages += file.user_messages;
        project.conversation_count += 1;
        project.most_recent_activity =
            latest(project.most_recent_activity, file.most_recent_activity);
        project
    })
}

/// Totals across several projects
pub fn aggregate_project_stats<'a, I>(projects: I) -> ProjectStats
where
    I: IntoIterator<Item = &'a ProjectStats>,
{
    projects.into_iter().fold(ProjectStats::default(), |mut total, project| {
        total.total_messages += project.total_messages;
        total.assistant_messages += project.assistant_messages;
        total.user_messages += project.user_messages;
        total.conversation_count += project.conversation_count;
        total.most_recent_activity =
            latest(total.most_recent_activity, project.most_recent_activity);
        total
    })
}
