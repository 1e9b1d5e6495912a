//! Viewer configuration.
//!
//! Defaults, overridden by environment variables, overridden again by command-line flags.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CLAUDE_VIEWER_PROJECTS_DIR` | `~/.claude/projects` | Root holding one directory per project |
//! | `CLAUDE_VIEWER_LISTING_LIMIT_BYTES` | 10 MiB | Ceiling for listing, stats and search enumeration |
//! | `CLAUDE_VIEWER_DETAIL_LIMIT_BYTES` | 25 MiB | Ceiling for full conversation reads |
//! | `CLAUDE_VIEWER_SCAN_THREADS` | 8 | Worker threads for per-file scans |

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

use crate::utils::environment::{get_projects_dir, read_env};

/// Ceiling for files read during listings, stats and search enumeration
pub const DEFAULT_LISTING_LIMIT_BYTES: u64 = 10 * 1024 * 1024;

/// Ceiling for files read in full for the detail view
pub const DEFAULT_DETAIL_LIMIT_BYTES: u64 = 25 * 1024 * 1024;

pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 100;
pub const DEFAULT_MAX_QUERY_CHARS: usize = 200;
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
pub const DEFAULT_SCAN_THREADS: usize = 8;

/// Runtime settings for the catalog and search engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub projects_dir: PathBuf,
    pub listing_limit_bytes: u64,
    pub detail_limit_bytes: u64,
    pub max_search_results: usize,
    pub max_query_chars: usize,
    pub preview_chars: usize,
    pub scan_threads: usize,
}

impl ViewerConfig {
    /// Configuration rooted at `projects_dir` with every other setting at its default
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
            listing_limit_bytes: DEFAULT_LISTING_LIMIT_BYTES,
            detail_limit_bytes: DEFAULT_DETAIL_LIMIT_BYTES,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_query_chars: DEFAULT_MAX_QUERY_CHARS,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            scan_threads: DEFAULT_SCAN_THREADS,
        }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if no projects directory can be determined or a numeric variable
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(read_env)
    }

    /// Load configuration through an arbitrary variable lookup
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let projects_dir = match lookup("CLAUDE_VIEWER_PROJECTS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => get_projects_dir()?,
        };

        let mut config = Self::new(projects_dir);
        if let Some(value) = lookup("CLAUDE_VIEWER_LISTING_LIMIT_BYTES") {
            config.listing_limit_bytes = parse_var("CLAUDE_VIEWER_LISTING_LIMIT_BYTES", &value)?;
        }
        if let Some(value) = lookup("CLAUDE_VIEWER_DETAIL_LIMIT_BYTES") {
            config.detail_limit_bytes = parse_var("CLAUDE_VIEWER_DETAIL_LIMIT_BYTES", &value)?;
        }
        if let Some(value) = lookup("CLAUDE_VIEWER_SCAN_THREADS") {
            config.scan_threads = parse_var("CLAUDE_VIEWER_SCAN_THREADS", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency of the settings
    ///
    /// # Errors
    ///
    /// Returns an error if the thread count is zero or a ceiling is zero.
    pub fn validate(&self) -> Result<()> {
        if self.scan_threads == 0 {
            bail!("scan thread count must be at least 1");
        }
        if self.listing_limit_bytes == 0 || self.detail_limit_bytes == 0 {
            bail!("file size ceilings must be greater than zero");
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse::<T>().with_context(|| format!("Invalid value for {}: {}", name, value))
}
