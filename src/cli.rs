//! Command-line surface. Flags only get parsed here; merging them with the
//! YAML file and the `GITLAB_MR_*` environment is the resolver's job, so the
//! file < flags < environment precedence stays in one place.

use std::path::PathBuf;

use clap::Parser;

/// Detect conflicting merge requests in a GitLab project.
#[derive(Debug, Default, Parser)]
#[command(name = "mrwatch", version, about)]
pub struct Cli {
    /// GitLab base URL, e.g. https://gitlab.example.com
    #[arg(long)]
    pub gitlab_url: Option<String>,

    /// Personal access token with api scope
    #[arg(long)]
    pub gitlab_token: Option<String>,

    /// Numeric project id
    #[arg(long)]
    pub project_id: Option<i64>,

    /// Restrict analysis to these MR IIDs (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub mr_iids: Option<Vec<i64>>,

    /// Post an analysis note on every MR whose labels change
    #[arg(long)]
    pub create_gitlab_note: bool,

    /// Write conflict labels back to GitLab
    #[arg(long)]
    pub update_mr_status: bool,

    /// Compute everything, mutate nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Elevate logging to debug
    #[arg(long)]
    pub verbose: bool,

    /// Consider draft MRs as well
    #[arg(long)]
    pub include_draft_mrs: bool,

    /// Globs for files to exclude from conflict detection (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ignore_patterns: Option<Vec<String>>,

    /// Match ignore patterns case-insensitively
    #[arg(long)]
    pub case_insensitive_patterns: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub http_timeout_seconds: Option<u64>,

    /// Path to a YAML configuration file
    #[arg(long)]
    pub config_file: Option<PathBuf>,
}
