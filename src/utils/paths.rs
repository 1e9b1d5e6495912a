use std::borrow::Cow;
use std::env;
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use tracing::warn;

use crate::error::{Result, ViewerError};

/// Extension of conversation log files
pub const CONVERSATION_EXTENSION: &str = ".jsonl";

// URI component set: everything except alphanumerics and - _ . ! ~ * ' ( )
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

// Characters that are not allowed in file names on common platforms
const FILESYSTEM_HOSTILE: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Encodes a file system path into the project directory format
///
/// Each path segment is percent-encoded and the separators become dashes, so the
/// encoding is only reversible for paths whose own segments contain no dashes.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use claude_viewer::encode_project_name;
///
/// let path = PathBuf::from("/Users/foo/bar");
/// assert_eq!(encode_project_name(&path), "-Users-foo-bar");
/// ```
pub fn encode_project_name(path: &Path) -> String {
    let path_str = path.to_string_lossy();
    let without_leading_slash = path_str.strip_prefix('/').unwrap_or(&path_str);
    let segments: Vec<String> = without_leading_slash
        .split('/')
        .map(|segment| utf8_percent_encode(segment, URI_COMPONENT).to_string())
        .collect();
    format!("-{}", segments.join("-"))
}

/// Decodes a project directory name back to a file system path
///
/// The encoding is lossy: a dash is either a separator or part of a name. When the naive
/// decoding does not exist on disk, trailing version-like segments (`v2`, `2024`) are
/// re-joined to the segments before them until a reconstruction that exists is found.
/// If none exists, the naive decoding is returned.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use claude_viewer::decode_project_name;
///
/// let encoded = "-Users-foo-bar";
/// assert_eq!(decode_project_name(encoded), PathBuf::from("/Users/foo/bar"));
/// ```
pub fn decode_project_name(internal_id: &str) -> PathBuf {
    decode_project_name_with(internal_id, |path| path.exists())
}

/// Decoding with an injectable existence check
pub(crate) fn decode_project_name_with<F>(internal_id: &str, exists: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let remainder = internal_id.strip_prefix('-').unwrap_or(internal_id);
    let naive = to_absolute_path(&remainder.replace('-', "/"));
    if exists(&naive) {
        return naive;
    }

    let segments: Vec<&str> = remainder.split('-').collect();
    let ends_with_version = segments.last().is_some_and(|last| is_version_segment(last));
    if ends_with_version {
        for split in (0..segments.len().saturating_sub(1)).rev() {
            let head = segments[..split].join("/");
            let tail = segments[split..].join("-");
            let candidate = to_absolute_path(&format!("{}/{}", head, tail));
            if exists(&candidate) {
                return candidate;
            }
        }
    }

    naive
}

/// `v<digits>` or `<digits>`
fn is_version_segment(segment: &str) -> bool {
    let digits = segment.strip_prefix('v').unwrap_or(segment);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn to_absolute_path(slashed: &str) -> PathBuf {
    let decoded = percent_decode_str(slashed).decode_utf8_lossy();
    let trimmed = decoded.trim_start_matches('/');
    PathBuf::from(format!("/{}", trimmed))
}

/// Human-readable project name: the last component of the path
pub fn project_name_from_path(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

/// Creates a URL-safe identifier for a project or session name
///
/// Not injective: names differing only in filesystem-hostile characters share an id.
///
/// # Examples
///
/// ```
/// use claude_viewer::utils::paths::to_url_safe;
///
/// assert_eq!(to_url_safe("my app: v2"), "my%20app-%20v2");
/// ```
pub fn to_url_safe(name: &str) -> String {
    let replaced: String =
        name.chars().map(|c| if FILESYSTEM_HOSTILE.contains(&c) { '-' } else { c }).collect();
    utf8_percent_encode(&replaced, URI_COMPONENT).to_string()
}

/// URL-safe identifier for a name that may not be valid UTF-8
pub fn to_url_safe_os(name: &OsStr) -> String {
    match name.to_str() {
        Some(name) => to_url_safe(name),
        None => fallback_url_safe(&name.to_string_lossy()),
    }
}

fn fallback_url_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || "-_.~".contains(c) { c } else { '-' })
        .collect()
}

/// Reverses the percent-encoding of [`to_url_safe`]; malformed input is returned unchanged
pub fn from_url_safe(id: &str) -> String {
    match percent_decode_str(id).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!(id, error = %e, "failed to decode URL-safe name");
            id.to_string()
        }
    }
}

/// Validates a caller-supplied project id as a single, non-traversing path component
///
/// # Errors
///
/// Returns [`ViewerError::InvalidInput`] for empty ids, ids containing separators or NUL,
/// and ids containing `..`.
pub fn validate_project_id(internal_id: &str) -> Result<()> {
    validate_path_component(internal_id, "project id")
}

/// Validates a caller-supplied conversation filename
///
/// # Errors
///
/// Same rules as [`validate_project_id`], and the name must end in `.jsonl`.
pub fn validate_conversation_filename(filename: &str) -> Result<()> {
    validate_path_component(filename, "conversation filename")?;
    if !filename.ends_with(CONVERSATION_EXTENSION) {
        return Err(ViewerError::InvalidInput(format!(
            "conversation filename must end in {}: {}",
            CONVERSATION_EXTENSION, filename
        )));
    }
    Ok(())
}

fn validate_path_component(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ViewerError::InvalidInput(format!("{} is empty", what)));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(ViewerError::InvalidInput(format!(
            "{} contains a path separator: {}",
            what, value
        )));
    }
    if value == "." || value.contains("..") {
        return Err(ViewerError::InvalidInput(format!(
            "{} contains a traversal sequence: {}",
            what, value
        )));
    }
    Ok(())
}

/// Validates that an open file is within `limit` bytes and returns its size
///
/// Takes the open handle to avoid TOCTOU races between the size check and the read.
///
/// # Errors
///
/// Returns [`ViewerError::Io`] if metadata cannot be read and [`ViewerError::TooLarge`]
/// if the file exceeds `limit`.
pub fn validate_file_size(file: &File, path: &Path, limit: u64) -> Result<u64> {
    let metadata = file.metadata().map_err(|e| ViewerError::io(path, e))?;

    let file_size = metadata.len();
    if file_size > limit {
        return Err(ViewerError::TooLarge { path: path.to_path_buf(), size: file_size, limit });
    }

    Ok(file_size)
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
