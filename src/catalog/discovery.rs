use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::catalog::stats::{FileStats, aggregate};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::models::{ConversationDetail, ConversationSummary, Project, ProjectStats};
use crate::parsers::{
    find_working_directory, list_conversation_files, load_conversation_file,
    read_full_conversation, scan_session_metadata,
};
use crate::utils::{
    decode_project_name, from_url_safe, project_name_from_path, to_url_safe,
    validate_conversation_filename, validate_project_id,
};

/// Number of conversation files examined when verifying a project's real path
const VERIFY_MAX_FILES: usize = 3;

/// Number of non-blank lines examined per file when verifying a project's real path
const VERIFY_MAX_LINES: usize = 5;

/// Lists projects and their conversations under the configured projects root
///
/// Every call re-scans the file system. Per-file scans run on a bounded pool owned by the
/// catalog so a project with thousands of files never holds more than `scan_threads` open.
pub struct ProjectCatalog {
    config: ViewerConfig,
    pool: ThreadPool,
}

impl ProjectCatalog {
    /// Create a catalog over `config.projects_dir`
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadPool`] if the scan pool cannot be started.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.scan_threads.max(1))
            .thread_name(|i| format!("catalog-scan-{}", i))
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Projects with decoded and verified names, without stats
    ///
    /// Order reflects directory enumeration and is otherwise unspecified.
    pub fn discover_projects(&self) -> Vec<Project> {
        let dirs = self.project_dirs();
        self.pool
            .install(|| dirs.par_iter().map(|(id, dir)| self.describe_project(id, dir)).collect())
    }

    /// Every project with aggregate stats over its conversation files
    ///
    /// Order is unspecified; use [`sort_by_recent_activity`] for recency order.
    pub fn list_projects(&self) -> Vec<Project> {
        let mut projects = self.discover_projects();
        self.pool.install(|| {
            projects.par_iter_mut().for_each(|project| {
                project.stats = self.project_stats(&project.project_dir);
            });
        });
        info!(projects = projects.len(), root = %self.config.projects_dir.display(), "listed projects");
        projects
    }

    /// Conversations of one project, most recent first
    ///
    /// Invalid ids and missing or unreadable directories yield an empty listing.
    pub fn list_conversations(&self, internal_id: &str) -> Vec<ConversationSummary> {
        match self.project_dir(internal_id) {
            Ok(dir) => self.conversations_in(&dir),
            Err(e) => {
                warn!(project = internal_id, error = %e, "cannot list conversations");
                Vec::new()
            }
        }
    }

    /// Every parsed record of one conversation
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] for ids or filenames that could resolve outside
    /// the project directory, [`ViewerError::NotFound`] when either does not exist, and
    /// [`ViewerError::TooLarge`] above the detail ceiling.
    pub fn read_conversation(&self, internal_id: &str, filename: &str) -> Result<ConversationDetail> {
        let dir = self.project_dir(internal_id)?;
        validate_conversation_filename(filename)?;

        let path = dir.join(filename);
        let metadata = fs::symlink_metadata(&path).map_err(|e| ViewerError::io(&path, e))?;
        if metadata.file_type().is_symlink() {
            return Err(ViewerError::InvalidInput(format!(
                "conversation file is a symlink: {}",
                filename
            )));
        }
        if !metadata.is_file() {
            return Err(ViewerError::NotFound(path.display().to_string()));
        }
        ensure_within(&dir, &path)?;

        read_full_conversation(&path, self.config.detail_limit_bytes)
    }

    /// Resolve a project id to its directory under the root
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidInput`] for malformed ids, symlinked directories and
    /// directories resolving outside the root; [`ViewerError::NotFound`] when absent.
    pub fn project_dir(&self, internal_id: &str) -> Result<PathBuf> {
        validate_project_id(internal_id)?;

        let dir = self.config.projects_dir.join(internal_id);
        let metadata = fs::symlink_metadata(&dir).map_err(|e| ViewerError::io(&dir, e))?;
        if metadata.file_type().is_symlink() {
            return Err(ViewerError::InvalidInput(format!(
                "project directory is a symlink: {}",
                internal_id
            )));
        }
        if !metadata.is_dir() {
            return Err(ViewerError::NotFound(dir.display().to_string()));
        }
        ensure_within(&self.config.projects_dir, &dir)?;

        Ok(dir)
    }

    /// Resolve a project key to its internal id
    ///
    /// The key is either an internal id or a project's URL-safe id. URL-safe ids are not
    /// unique; the first project in enumeration order whose id or decoded name matches wins.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::NotFound`] when no project matches, and the errors of
    /// [`ProjectCatalog::project_dir`] for keys that look like internal ids but are rejected.
    pub fn resolve_project_id(&self, key: &str) -> Result<String> {
        match self.project_dir(key) {
            Ok(_) => return Ok(key.to_string()),
            Err(ViewerError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let name = from_url_safe(key);
        self.discover_projects()
            .into_iter()
            .find(|project| project.url_safe_id == key || project.project_name == name)
            .map(|project| project.internal_id)
            .ok_or_else(|| ViewerError::NotFound(format!("project {}", key)))
    }

    /// Conversation summaries of a project directory, most recent first
    pub(crate) fn conversations_in(&self, dir: &Path) -> Vec<ConversationSummary> {
        let files = match list_conversation_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read project directory");
                return Vec::new();
            }
        };

        let limit = self.config.listing_limit_bytes;
        let mut conversations: Vec<ConversationSummary> = self.pool.install(|| {
            files
                .par_iter()
                .filter_map(|path| match scan_session_metadata(path, limit) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        log_skipped(path, &e);
                        None
                    }
                })
                .collect()
        });

        // Stable: equal timestamps keep enumeration order
        conversations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        conversations
    }

    /// Subdirectories of the root as (internal id, path) pairs
    fn project_dirs(&self) -> Vec<(String, PathBuf)> {
        let root = &self.config.projects_dir;
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "projects directory does not exist");
                return Vec::new();
            }
            Err(e) => {
                warn!(root = %root.display(), error = %e, "failed to read projects directory");
                return Vec::new();
            }
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping project directory");
                    continue;
                }
            };
            if file_type.is_symlink() {
                warn!(path = %path.display(), "skipping symlinked project directory");
                continue;
            }
            if !file_type.is_dir() {
                continue;
            }

            match entry.file_name().into_string() {
                Ok(internal_id) => dirs.push((internal_id, path)),
                Err(name) => {
                    warn!(name = ?name, "skipping project directory with non UTF-8 name");
                }
            }
        }

        dirs
    }

    fn describe_project(&self, internal_id: &str, dir: &Path) -> Project {
        let (display_path, project_name) = match self.verified_working_directory(dir) {
            Some(cwd) => {
                let name = project_name_from_path(Path::new(&cwd));
                (cwd, name)
            }
            None => {
                let decoded = decode_project_name(internal_id);
                let name = project_name_from_path(&decoded);
                (decoded.to_string_lossy().into_owned(), name)
            }
        };

        Project {
            internal_id: internal_id.to_string(),
            url_safe_id: to_url_safe(&project_name),
            display_path,
            project_name,
            stats: ProjectStats::default(),
            project_dir: dir.to_path_buf(),
        }
    }

    /// Working directory recorded inside the project's first few conversation files
    fn verified_working_directory(&self, dir: &Path) -> Option<String> {
        let files = list_conversation_files(dir).ok()?;
        for path in files.iter().take(VERIFY_MAX_FILES) {
            match find_working_directory(path, self.config.listing_limit_bytes, VERIFY_MAX_LINES) {
                Ok(Some(cwd)) => return Some(cwd),
                Ok(None) => {}
                Err(e) => debug!(path = %path.display(), error = %e, "skipping file during verification"),
            }
        }
        None
    }

    fn project_stats(&self, dir: &Path) -> ProjectStats {
        let files = match list_conversation_files(dir) {
            Ok(files) => files,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "failed to read project directory");
                return ProjectStats::default();
            }
        };

        let limit = self.config.listing_limit_bytes;
        let per_file: Vec<FileStats> = files
            .par_iter()
            .filter_map(|path| match load_conversation_file(path, limit) {
                Ok(file) => Some(FileStats::from_file(&file)),
                Err(e) => {
                    log_skipped(path, &e);
                    None
                }
            })
            .collect();

        aggregate(per_file)
    }
}

/// Order projects by most recent activity, projects without activity last
pub fn sort_by_recent_activity(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.stats.most_recent_activity.cmp(&a.stats.most_recent_activity));
}

/// Confirm that `path` resolves inside `root`
fn ensure_within(root: &Path, path: &Path) -> Result<()> {
    let canonical_root = root.canonicalize().map_err(|e| ViewerError::io(root, e))?;
    let canonical = path.canonicalize().map_err(|e| ViewerError::io(path, e))?;
    if canonical == canonical_root || !canonical.starts_with(&canonical_root) {
        return Err(ViewerError::InvalidInput(format!(
            "path resolves outside {}: {}",
            root.display(),
            path.display()
        )));
    }
    Ok(())
}

fn log_skipped(path: &Path, error: &ViewerError) {
    match error {
        ViewerError::TooLarge { .. } => {
            warn!(path = %path.display(), error = %error, "file exceeds size limit, skipping")
        }
        ViewerError::NotFound(_) => {
            debug!(path = %path.display(), "file disappeared during scan, skipping")
        }
        _ => warn!(path = %path.display(), error = %error, "failed to scan file, skipping"),
    }
}
