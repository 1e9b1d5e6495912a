use std::ops::ControlFlow;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::ProjectCatalog;
use crate::error::{Result, ViewerError};
use crate::models::{ConversationSummary, Project, SearchResponse, SearchResult};
use crate::parsers::records::{record_timestamp, record_type};
use crate::parsers::{extract_display_text, stream_non_blank_lines, truncate_text};

/// Streams conversation files looking for a query string
pub struct SearchEngine<'a> {
    catalog: &'a ProjectCatalog,
}

impl<'a> SearchEngine<'a> {
    pub fn new(catalog: &'a ProjectCatalog) -> Self {
        Self { catalog }
    }

    /// Search every conversation of every project for `query`
    ///
    /// An empty query returns no results. Projects are visited in enumeration order and
    /// their conversations most recent first. A conversation is always scanned to its end;
    /// once `max_search_results` matches have been collected no further file or project is
    /// opened. The collected matches are sorted most recent first, records without a
    /// timestamp last, and cut to `max_search_results`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] if the query is longer than
    /// `max_query_chars` characters.
    pub fn search(&self, query: &str) -> Result<SearchResponse> {
        let config = self.catalog.config();
        if query.is_empty() {
            return Ok(SearchResponse::default());
        }
        let query_chars = query.chars().count();
        if query_chars > config.max_query_chars {
            return Err(ViewerError::InvalidInput(format!(
                "search query is {} characters, max {}",
                query_chars, config.max_query_chars
            )));
        }

        let needle = query.to_lowercase();
        let cap = config.max_search_results;
        let mut results = Vec::new();

        'projects: for project in self.catalog.discover_projects() {
            for conversation in self.catalog.conversations_in(&project.project_dir) {
                if results.len() >= cap {
                    break 'projects;
                }
                self.search_conversation(&project, &conversation, &needle, &mut results);
            }
            if results.len() >= cap {
                break;
            }
        }

        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        results.truncate(cap);
        info!(query_chars, results = results.len(), "search finished");

        Ok(SearchResponse { results })
    }

    fn search_conversation(
        &self,
        project: &Project,
        conversation: &ConversationSummary,
        needle: &str,
        results: &mut Vec<SearchResult>,
    ) {
        let config = self.catalog.config();
        let path = project.project_dir.join(&conversation.filename);

        let outcome = stream_non_blank_lines(&path, config.detail_limit_bytes, |line_number, line| {
            if line.to_lowercase().contains(needle) {
                match serde_json::from_str::<Value>(line) {
                    Ok(record) => results.push(SearchResult {
                        project_display_name: project.display_path.clone(),
                        project_internal_id: project.internal_id.clone(),
                        conversation_session_id: conversation.session_id.clone(),
                        filename: conversation.filename.clone(),
                        line_number,
                        timestamp: record_timestamp(&record),
                        message_type: record_type(&record).map(str::to_string),
                        preview_text: truncate_text(&extract_display_text(&record), config.preview_chars),
                    }),
                    Err(e) => {
                        debug!(path = %path.display(), line = line_number, error = %e, "skipping malformed matching line");
                    }
                }
            }
            // The cap is checked between files
            ControlFlow::Continue(())
        });

        if let Err(e) = outcome {
            warn!(path = %path.display(), error = %e, "failed to search conversation, skipping");
        }
    }
}
