use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::catalog::{ProjectCatalog, aggregate_project_stats, sort_by_recent_activity};
use crate::config::ViewerConfig;
use crate::search::SearchEngine;
use crate::utils::{format_path_with_tilde, validate_conversation_filename, validate_project_id};

#[derive(Parser)]
#[command(name = "claude-viewer")]
#[command(version = "0.1.0")]
#[command(about = "Browse Claude Code conversation logs by project", long_about = None)]
pub struct Cli {
    /// Directory holding one subdirectory per project (default: ~/.claude/projects)
    #[arg(long, global = true, value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects with message statistics
    Projects {
        /// Most recently active projects first
        #[arg(long)]
        recent: bool,
    },
    /// List the conversations of a project, most recent first
    Conversations {
        /// Project internal id or URL-safe id as listed by `projects`
        project: String,
    },
    /// Print every record of one conversation
    Show {
        /// Project internal id or URL-safe id
        project: String,
        /// Conversation file name, e.g. `<session>.jsonl`
        filename: String,
    },
    /// Search every conversation for a case-insensitive substring
    Search { query: String },
    /// Show totals across all projects
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let mut config = ViewerConfig::from_env()?;
    if let Some(dir) = &cli.projects_dir {
        config.projects_dir = dir.clone();
    }
    let catalog = ProjectCatalog::new(config).context("Failed to start project catalog")?;

    match command {
        Commands::Projects { recent } => {
            let mut projects = catalog.list_projects();
            if *recent {
                sort_by_recent_activity(&mut projects);
            }
            print_json(&projects, cli.compact)?;
        }
        Commands::Conversations { project } => {
            validate_project_id(project)?;
            let internal_id = catalog.resolve_project_id(project)?;
            print_json(&catalog.list_conversations(&internal_id), cli.compact)?;
        }
        Commands::Show { project, filename } => {
            validate_project_id(project)?;
            validate_conversation_filename(filename)?;
            let internal_id = catalog.resolve_project_id(project)?;
            let detail = catalog
                .read_conversation(&internal_id, filename)
                .with_context(|| format!("Failed to read conversation {}", filename))?;
            print_json(&detail, cli.compact)?;
        }
        Commands::Search { query } => {
            let response = SearchEngine::new(&catalog).search(query)?;
            print_json(&response, cli.compact)?;
        }
        Commands::Stats => show_stats(&catalog),
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", json);
    Ok(())
}

fn show_stats(catalog: &ProjectCatalog) {
    let projects = catalog.list_projects();
    let totals = aggregate_project_stats(projects.iter().map(|p| &p.stats));

    println!("Claude Conversation Statistics");
    println!("==============================");
    println!("Projects: {}", projects.len());
    println!("Conversations: {}", totals.conversation_count);
    println!("Total messages: {}", totals.total_messages);
    println!("  User messages: {}", totals.user_messages);
    println!("  Assistant messages: {}", totals.assistant_messages);
    println!();
    println!("Projects directory: {}", format_path_with_tilde(&catalog.config().projects_dir));

    if let Some(latest) = totals.most_recent_activity {
        println!("Most recent activity: {}", latest.format("%Y-%m-%d %H:%M:%S"));
    }
}
