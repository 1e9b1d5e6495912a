//! Tolerant readers for conversation JSONL files
//!
//! # Error Handling Strategy
//!
//! Conversation files are written by another tool and may be truncated or hand-edited, so
//! the scanner degrades at the smallest possible unit:
//!
//! - **Individual line failures**: a line that is not valid JSON is logged at debug level and
//!   dropped. It is not counted as a message and never aborts the scan of the file.
//!
//! - **File failures**: oversized, missing or unreadable files surface as a
//!   [`ViewerError`](crate::error::ViewerError) to the caller, which decides whether the file
//!   is skipped (listings, stats, search) or reported (a direct detail read).
//!
//! - **Size ceilings**: every read checks the size on the open handle before reading, so a
//!   runaway file costs one `stat` rather than a full read.

pub mod conversation;
pub mod records;

pub use conversation::{
    ConversationFile, extract_display_text, find_working_directory, list_conversation_files,
    load_conversation_file, read_full_conversation, scan_session_metadata,
    stream_non_blank_lines, summarize_conversation, truncate_text,
};
