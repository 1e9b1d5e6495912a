use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the Claude directory path (~/.claude)
///
/// `HOME` wins over the platform lookup so tests and wrappers can redirect it.
pub fn get_claude_dir() -> Result<PathBuf> {
    let home = match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => dirs::home_dir().context("HOME environment variable not set")?,
    };
    Ok(home.join(".claude"))
}

/// Get the directory holding one subdirectory per project (~/.claude/projects)
pub fn get_projects_dir() -> Result<PathBuf> {
    Ok(get_claude_dir()?.join("projects"))
}

/// Read an optional environment variable, treating empty values as unset
pub(crate) fn read_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
