use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, ViewerError};
use crate::models::{ConversationDetail, ConversationSummary};
use crate::parsers::records::{is_summary, record_timestamp, str_field};
use crate::utils::{CONVERSATION_EXTENSION, to_url_safe, validate_file_size};

/// One conversation file read in full, with the records that parsed
#[derive(Debug, Clone)]
pub struct ConversationFile {
    pub path: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
    /// Parsed records in line order; malformed lines are absent
    pub records: Vec<Value>,
    pub malformed_lines: usize,
}

impl ConversationFile {
    /// Session id implied by the filename
    pub fn file_stem(&self) -> &str {
        self.filename.strip_suffix(CONVERSATION_EXTENSION).unwrap_or(&self.filename)
    }
}

struct RawFile {
    filename: String,
    size_bytes: u64,
    modified: Option<DateTime<Utc>>,
    content: Vec<u8>,
}

/// Open a file, check it against `limit` on the open handle, and read it whole
fn read_raw(path: &Path, limit: u64) -> Result<RawFile> {
    let mut file = File::open(path).map_err(|e| ViewerError::io(path, e))?;
    let size_bytes = validate_file_size(&file, path, limit)?;
    let modified =
        file.metadata().ok().and_then(|m| m.modified().ok()).map(DateTime::<Utc>::from);

    let mut content = Vec::with_capacity(size_bytes as usize);
    // A file growing past the ceiling after the check is cut at the ceiling
    (&mut file).take(limit).read_to_end(&mut content).map_err(|e| ViewerError::io(path, e))?;

    Ok(RawFile { filename: filename_of(path), size_bytes, modified, content })
}

fn filename_of(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Lines with content, decoded lossily
fn non_blank_lines(content: &[u8]) -> impl Iterator<Item = Cow<'_, str>> {
    content
        .split(|&b| b == b'\n')
        .map(String::from_utf8_lossy)
        .filter(|line| !line.trim().is_empty())
}

/// Load and parse a conversation file
///
/// Each non-blank line is parsed independently; lines that are not valid JSON are
/// logged and dropped without affecting the rest of the file.
///
/// # Errors
///
/// Returns [`ViewerError::TooLarge`] above `limit`, [`ViewerError::NotFound`] or
/// [`ViewerError::Io`] when the file cannot be read.
pub fn load_conversation_file(path: &Path, limit: u64) -> Result<ConversationFile> {
    let raw = read_raw(path, limit)?;

    let mut records = Vec::new();
    let mut malformed_lines = 0;
    for (line_num, line) in non_blank_lines(&raw.content).enumerate() {
        match serde_json::from_str::<Value>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!(path = %path.display(), line = line_num + 1, error = %e, "skipping malformed line");
                malformed_lines += 1;
            }
        }
    }

    Ok(ConversationFile {
        path: path.to_path_buf(),
        filename: raw.filename,
        size_bytes: raw.size_bytes,
        modified: raw.modified,
        records,
        malformed_lines,
    })
}

/// Session metadata for the conversation listing
///
/// Two independent passes over the records: the first summary record carrying a summary
/// text, and the first non-summary record for id, timestamp, working directory and branch.
/// Missing values fall back to the filename and the file's modification time.
pub fn summarize_conversation(file: &ConversationFile) -> ConversationSummary {
    let summary = file
        .records
        .iter()
        .filter(|record| is_summary(record))
        .find_map(|record| str_field(record, "summary"));

    let first_message = file.records.iter().find(|record| !is_summary(record));
    let fallback_time = file.modified.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    let session_id = first_message
        .and_then(|record| str_field(record, "sessionId"))
        .unwrap_or_else(|| file.file_stem())
        .to_string();
    let timestamp = first_message.and_then(record_timestamp).unwrap_or(fallback_time);
    let working_directory =
        first_message.and_then(|record| str_field(record, "cwd")).map(str::to_string);
    let git_branch =
        first_message.and_then(|record| str_field(record, "gitBranch")).map(str::to_string);

    ConversationSummary {
        filename: file.filename.clone(),
        url_safe_id: to_url_safe(&session_id),
        session_id,
        timestamp,
        working_directory,
        git_branch,
        short_summary: summary.map(str::to_string),
        size_bytes: file.size_bytes,
    }
}

/// Load a file and summarize it for the conversation listing
///
/// # Errors
///
/// See [`load_conversation_file`].
pub fn scan_session_metadata(path: &Path, limit: u64) -> Result<ConversationSummary> {
    let file = load_conversation_file(path, limit)?;
    Ok(summarize_conversation(&file))
}

/// Every record of a conversation that parsed, in file order
///
/// # Errors
///
/// See [`load_conversation_file`].
pub fn read_full_conversation(path: &Path, limit: u64) -> Result<ConversationDetail> {
    let file = load_conversation_file(path, limit)?;
    if file.malformed_lines > 0 {
        warn!(
            path = %path.display(),
            skipped = file.malformed_lines,
            parsed = file.records.len(),
            "dropped malformed lines from conversation"
        );
    }
    Ok(ConversationDetail {
        filename: file.filename,
        message_count: file.records.len(),
        messages: file.records,
    })
}

/// First working directory recorded in the head of a conversation file
///
/// Only the first `max_lines` non-blank lines are examined; the first non-summary record
/// with a non-empty `cwd` wins.
///
/// # Errors
///
/// See [`load_conversation_file`].
pub fn find_working_directory(path: &Path, limit: u64, max_lines: usize) -> Result<Option<String>> {
    let mut cwd = None;
    stream_non_blank_lines(path, limit, |line_number, line| {
        if line_number > max_lines {
            return ControlFlow::Break(());
        }
        if let Ok(record) = serde_json::from_str::<Value>(line)
            && !is_summary(&record)
            && let Some(found) = str_field(&record, "cwd")
        {
            cwd = Some(found.to_string());
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })?;
    Ok(cwd)
}

/// Stream the non-blank lines of a file without holding it in memory
///
/// `visit` receives the 1-based index among non-blank lines and the raw line text, and may
/// stop the stream early by returning [`ControlFlow::Break`].
///
/// # Errors
///
/// Returns [`ViewerError::TooLarge`] above `limit` and [`ViewerError::Io`] on read failures.
pub fn stream_non_blank_lines<F>(path: &Path, limit: u64, mut visit: F) -> Result<()>
where
    F: FnMut(usize, &str) -> ControlFlow<()>,
{
    let file = File::open(path).map_err(|e| ViewerError::io(path, e))?;
    validate_file_size(&file, path, limit)?;

    let reader = BufReader::new(file.take(limit));
    let mut line_number = 0;
    for chunk in reader.split(b'\n') {
        let chunk = chunk.map_err(|e| ViewerError::io(path, e))?;
        let line = String::from_utf8_lossy(&chunk);
        if line.trim().is_empty() {
            continue;
        }
        line_number += 1;
        if visit(line_number, &line).is_break() {
            break;
        }
    }
    Ok(())
}

/// Renderable text of a record
///
/// String content is used as is. Content arrays contribute each item's `text`, else its
/// `thinking`, else the item's JSON, joined by spaces. Any other shape is serialized whole.
pub fn extract_display_text(record: &Value) -> String {
    if let Some(message) = record.get("message").filter(|m| !m.is_null()) {
        match message.get("content") {
            Some(Value::String(text)) => return text.clone(),
            Some(Value::Array(items)) => {
                return items.iter().map(content_item_text).collect::<Vec<_>>().join(" ");
            }
            _ => {}
        }
    }
    record.to_string()
}

fn content_item_text(item: &Value) -> String {
    str_field(item, "text")
        .or_else(|| str_field(item, "thinking"))
        .map(str::to_string)
        .unwrap_or_else(|| item.to_string())
}

/// First `max_chars` characters of `text`, with `...` appended when anything was cut
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Regular `*.jsonl` files directly inside `dir`, in enumeration order
///
/// Symlinked files are skipped so a listing never reads outside the projects root.
///
/// # Errors
///
/// Returns an error only when `dir` itself cannot be read; unreadable entries are skipped.
pub fn list_conversation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("failed to read directory"));
                return Err(ViewerError::io(dir, source));
            }
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_name().to_string_lossy().ends_with(CONVERSATION_EXTENSION) {
            continue;
        }
        if entry.path_is_symlink() {
            warn!(path = %entry.path().display(), "skipping symlinked conversation file");
            continue;
        }
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
