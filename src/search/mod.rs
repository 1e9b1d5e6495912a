//! Bounded full-text search over every conversation file
//!
//! Matching is a case-insensitive substring test against the raw line text, not the parsed
//! record, so JSON keys and escaped content match too. Collection stops as soon as the
//! result cap is reached; the collected results are then ordered by record timestamp.

pub mod engine;

pub use engine::SearchEngine;
