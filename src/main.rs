mod cli;
mod config;
mod detect;
mod error;
mod gitlab;
mod model;
mod pattern;
mod reconcile;
mod report;

use clap::Parser;
use std::time::Duration;

use cli::Cli;
use config::Config;
use detect::Detector;
use error::{Error, Result};
use gitlab::types::MergeRequestState;
use gitlab::{GitLabApi, GitLabClient};
use model::{Conflict, MergeRequestSummary};
use pattern::IgnoreRules;
use reconcile::ReconcileOptions;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const PKG_NAME: &str = env!("CARGO_PKG_NAME");

fn main() {
    let cli = Cli::parse();

    let config = match config::resolve(&cli, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    };

    init_logging(config.verbose);
    log::info!("Starting {} v{}", PKG_NAME, VERSION);

    match run(&config) {
        Ok(conflicts) if conflicts.is_empty() => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    }
}

/// `--verbose` raises the default filter to debug; an explicit MRWATCH_LOG
/// still wins over both.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("MRWATCH_LOG", default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(config: &Config) -> Result<Vec<Conflict>> {
    let client = GitLabClient::new(
        &config.gitlab_url,
        &config.gitlab_token,
        Duration::from_secs(config.http_timeout_seconds),
    )?;

    if !client.has_project_access(config.project_id)? {
        return Err(Error::Auth(format!(
            "project {} is not accessible with token {}",
            config.project_id,
            config::mask_token(&config.gitlab_token)
        )));
    }

    let snapshot = fetch_snapshot(&client, config)?;
    log::info!("analyzing {} open merge request(s)", snapshot.len());

    let ignore = IgnoreRules::new(
        config.ignore_patterns.clone(),
        config.case_insensitive_patterns,
    );
    let conflicts = Detector::default().detect(&snapshot, &ignore);
    log::info!(
        "detected {} conflict(s) involving {} merge request(s)",
        conflicts.len(),
        detect::conflicting_ids(&conflicts).len()
    );

    println!("{}", report::render_conflict_list(&conflicts));

    if config.update_mr_status || config.create_gitlab_note {
        let outcome = reconcile::reconcile(
            &client,
            config.project_id,
            &conflicts,
            &snapshot,
            ReconcileOptions {
                update_status: config.update_mr_status,
                create_notes: config.create_gitlab_note,
                dry_run: config.dry_run,
            },
        );
        log::info!(
            "reconciliation: {} label update(s), {} note(s), {} unchanged, {} failed",
            outcome.labels_updated,
            outcome.notes_posted,
            outcome.unchanged,
            outcome.failed
        );
    }

    Ok(conflicts)
}

/// One consistent snapshot of the MRs to analyze: the open list (or the
/// configured IIDs), minus drafts unless they are wanted, each with its
/// change records. Any fetch failure aborts the run.
fn fetch_snapshot(api: &dyn GitLabApi, config: &Config) -> Result<Vec<MergeRequestSummary>> {
    let raw = if config.merge_request_iids.is_empty() {
        api.list_open_merge_requests(config.project_id)?
    } else {
        let mut out = Vec::new();
        for iid in &config.merge_request_iids {
            let mr = api.get_merge_request(config.project_id, *iid)?;
            if mr.state != MergeRequestState::Opened {
                log::warn!("MR !{iid} is not open, skipping");
                continue;
            }
            out.push(mr);
        }
        out
    };

    let mut snapshot = Vec::new();
    for mr in raw {
        if mr.is_draft() && !config.include_draft_mrs {
            log::debug!("skipping draft MR !{}", mr.iid);
            continue;
        }
        let changes = api.get_merge_request_changes(config.project_id, mr.iid)?;
        snapshot.push(MergeRequestSummary::from_api(&mr, &changes));
    }
    Ok(snapshot)
}
