//! Data contracts handed to the transport layer.
//!
//! - [`Project`] and [`ProjectStats`] - one entry per project directory
//! - [`ConversationSummary`] - listing entry for one conversation file
//! - [`ConversationDetail`] - the parsed records of one conversation file
//! - [`SearchResult`] and [`SearchResponse`] - bounded search output
//!
//! Field names serialize in camelCase. Every value is built per request and never cached.

pub mod conversation;
pub mod project;
pub mod search;

pub use conversation::{ConversationDetail, ConversationSummary};
pub use project::{Project, ProjectStats};
pub use search::{SearchResponse, SearchResult};
