//! Claude Viewer - browse Claude Code conversation logs by project
//!
//! This library reads the conversation logs Claude Code stores under
//! `~/.claude/projects/` and exposes them as JSON-serializable data contracts:
//!
//! - Decoding project directory names back to file system paths and display names
//! - Listing projects with message counts and most recent activity
//! - Listing the conversations of a project with session metadata and summaries
//! - Reading a full conversation, tolerating malformed lines
//! - Bounded, case-insensitive full-text search across every conversation
//!
//! Nothing is cached: every call re-scans the file system.
//!
//! # Example
//!
//! ```no_run
//! use claude_viewer::{ProjectCatalog, SearchEngine, ViewerConfig};
//!
//! let catalog = ProjectCatalog::new(ViewerConfig::new("/Users/alice/.claude/projects"))?;
//! for project in catalog.list_projects() {
//!     println!("{} ({} conversations)", project.display_path, project.stats.conversation_count);
//! }
//! let hits = SearchEngine::new(&catalog).search("migration")?;
//! println!("{} matches", hits.results.len());
//! # Ok::<(), claude_viewer::ViewerError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use catalog::{ProjectCatalog, sort_by_recent_activity};
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use models::{
    ConversationDetail, ConversationSummary, Project, ProjectStats, SearchResponse, SearchResult,
};
pub use search::SearchEngine;
pub use utils::paths::{decode_project_name, encode_project_name};
