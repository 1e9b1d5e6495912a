//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use claude_viewer::{ProjectCatalog, ViewerConfig};
use tempfile::TempDir;

/// Builder for creating test projects root structures
pub struct ProjectsDirBuilder {
    temp_dir: TempDir,
}

impl ProjectsDirBuilder {
    /// Create a new builder with an empty projects root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the projects root
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a project directory with the given internal id and conversation files
    pub fn with_project(self, internal_id: &str, files: &[ConversationFileBuilder]) -> Self {
        let project_dir = self.temp_dir.path().join(internal_id);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");

        for file in files {
            file.create_in(&project_dir);
        }

        self
    }

    /// Add a raw file to a project directory
    pub fn with_raw_file(self, internal_id: &str, filename: &str, content: &[u8]) -> Self {
        let project_dir = self.temp_dir.path().join(internal_id);
        fs::create_dir_all(&project_dir).expect("Failed to create project dir");
        let mut file =
            fs::File::create(project_dir.join(filename)).expect("Failed to create raw file");
        file.write_all(content).expect("Failed to write raw file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ProjectsDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog over a projects root with a small scan pool
pub fn catalog_for(root: &Path) -> ProjectCatalog {
    let mut config = ViewerConfig::new(root);
    config.scan_threads = 2;
    ProjectCatalog::new(config).expect("Failed to create catalog")
}

/// 2000-01-01T00:00:00Z, older than every record timestamp used in tests
pub fn fixture_mtime() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(946_684_800)
}

/// Builder for conversation files
///
/// Files get a fixed old modification time so that record timestamps decide activity.
pub struct ConversationFileBuilder {
    filename: String,
    lines: Vec<String>,
    modified: SystemTime,
}

impl ConversationFileBuilder {
    /// Create a new conversation file with the given filename
    pub fn new(filename: &str) -> Self {
        Self { filename: filename.to_string(), lines: Vec::new(), modified: fixture_mtime() }
    }

    /// Override the file's modification time
    pub fn modified(mut self, modified: SystemTime) -> Self {
        self.modified = modified;
        self
    }

    /// Add a record
    pub fn with_record(mut self, record: RecordBuilder) -> Self {
        self.lines.push(record.to_json());
        self
    }

    /// Add a raw line, which need not be valid JSON
    pub fn with_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Path the file will have inside `dir`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.filename)
    }

    /// Create the file in the given directory
    pub fn create_in(&self, dir: &Path) {
        let mut file = fs::File::create(self.path_in(dir)).expect("Failed to create file");
        file.write_all(self.lines.join("\n").as_bytes()).expect("Failed to write file");
        file.set_modified(self.modified).expect("Failed to set modification time");
    }
}

/// Builder for conversation records
pub struct RecordBuilder {
    record_type: String,
    session_id: Option<String>,
    timestamp: Option<String>,
    cwd: Option<String>,
    git_branch: Option<String>,
    content: Option<String>,
    summary: Option<String>,
}

impl RecordBuilder {
    fn of_type(record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            session_id: None,
            timestamp: None,
            cwd: None,
            git_branch: None,
            content: None,
            summary: None,
        }
    }

    /// A user message
    pub fn user() -> Self {
        Self::of_type("user").session_id("550e8400-e29b-41d4-a716-446655440000")
    }

    /// An assistant message
    pub fn assistant() -> Self {
        Self::of_type("assistant").session_id("550e8400-e29b-41d4-a716-446655440000")
    }

    /// A summary record
    pub fn summary(text: &str) -> Self {
        let mut record = Self::of_type("summary");
        record.summary = Some(text.to_string());
        record
    }

    /// A record of any other type
    pub fn other(record_type: &str) -> Self {
        Self::of_type(record_type)
    }

    pub fn session_id(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    /// RFC3339 timestamp
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }

    pub fn git_branch(mut self, branch: &str) -> Self {
        self.git_branch = Some(branch.to_string());
        self
    }

    /// Plain string message content
    pub fn text(mut self, text: &str) -> Self {
        self.content = Some(text.to_string());
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        let mut record = serde_json::Map::new();
        record.insert("type".into(), self.record_type.clone().into());
        if let Some(summary) = &self.summary {
            record.insert("summary".into(), summary.clone().into());
        }
        if let Some(session_id) = &self.session_id {
            record.insert("sessionId".into(), session_id.clone().into());
        }
        if let Some(timestamp) = &self.timestamp {
            record.insert("timestamp".into(), timestamp.clone().into());
        }
        if let Some(cwd) = &self.cwd {
            record.insert("cwd".into(), cwd.clone().into());
        }
        if let Some(branch) = &self.git_branch {
            record.insert("gitBranch".into(), branch.clone().into());
        }
        if let Some(content) = &self.content {
            record.insert(
                "message".into(),
                serde_json::json!({ "role": self.record_type, "content": content }),
            );
        }
        serde_json::Value::Object(record).to_string()
    }
}

/// Helper to create a realistic projects root with sample data
pub fn realistic_projects_dir() -> TempDir {
    ProjectsDirBuilder::new()
        .with_project(
            "-Users-test-project1",
            &[ConversationFileBuilder::new("session-1.jsonl")
                .with_record(RecordBuilder::summary("Set up the build"))
                .with_record(
                    RecordBuilder::user()
                        .session_id("session-1")
                        .timestamp("2024-05-01T10:00:00Z")
                        .cwd("/Users/test/project1")
                        .git_branch("main")
                        .text("Hello from project"),
                )
                .with_record(
                    RecordBuilder::assistant()
                        .session_id("session-1")
                        .timestamp("2024-05-01T10:00:05Z")
                        .text("Hi there"),
                )],
        )
        .with_project(
            "-Users-test-project2",
            &[ConversationFileBuilder::new("session-2.jsonl").with_record(
                RecordBuilder::user()
                    .session_id("session-2")
                    .timestamp("2024-06-01T09:00:00Z")
                    .text("Another project"),
            )],
        )
        .build()
}
