//! Project and conversation catalog over the projects root
//!
//! # Error Handling Strategy
//!
//! The catalog never fails a listing because of one bad input:
//!
//! - **File-level failures**: oversized, vanished or unreadable conversation files are
//!   logged and left out of listings and stats. They do not count as conversations.
//!
//! - **Project-level failures**: an unreadable project directory contributes an empty
//!   conversation list and zero stats; sibling projects are still listed.
//!
//! - **Root failures**: a missing or unreadable projects root yields empty listings.
//!
//! - **Caller input**: project ids and filenames naming something outside the root are
//!   rejected with [`ViewerError::InvalidInput`](crate::error::ViewerError::InvalidInput)
//!   before anything is opened.

pub mod discovery;
pub mod stats;

pub use discovery::{ProjectCatalog, sort_by_recent_activity};
pub use stats::{FileStats, aggregate, aggregate_project_stats};
