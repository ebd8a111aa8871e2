//! GitLab-side reconciliation: converts this run's detection result into
//! label and note updates, and recognizes conflicts that have resolved since
//! the previous run.
//!
//! Labels are the only durable state. For every open MR the desired label
//! set is recomputed from scratch against the current one, and the network
//! is touched only when the two differ, so a second pass over an unchanged
//! snapshot performs no mutations.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::gitlab::types::MergeRequest;
use crate::gitlab::GitLabApi;
use crate::model::{self, Conflict, MergeRequestSummary, CONFLICTS_LABEL};
use crate::report;

/// Behavior switches for one reconciliation pass.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    pub update_status: bool,
    pub create_notes: bool,
    pub dry_run: bool,
}

/// Counters for the run summary log line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub labels_updated: usize,
    pub notes_posted: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Walk every open MR and bring its labels (and, on changes, its notes) in
/// line with the detection result. Platform failures for one MR are logged
/// and skipped; they never abort the loop.
pub fn reconcile(
    api: &dyn GitLabApi,
    project_id: i64,
    conflicts: &[Conflict],
    open_mrs: &[MergeRequestSummary],
    opts: ReconcileOptions,
) -> ReconcileOutcome {
    let mut outcome = ReconcileOutcome::default();
    for mr in open_mrs {
        if let Err(err) = reconcile_one(api, project_id, conflicts, mr, opts, &mut outcome) {
            log::warn!("skipping MR !{}: {err}", mr.id);
            outcome.failed += 1;
        }
    }
    outcome
}

fn reconcile_one(
    api: &dyn GitLabApi,
    project_id: i64,
    conflicts: &[Conflict],
    mr: &MergeRequestSummary,
    opts: ReconcileOptions,
    outcome: &mut ReconcileOutcome,
) -> Result<()> {
    let relevant: Vec<&Conflict> = conflicts.iter().filter(|c| c.involves(mr.id)).collect();
    let peer_ids: BTreeSet<i64> = relevant
        .iter()
        .filter_map(|c| c.peer_of(mr.id))
        .map(|peer| peer.id)
        .collect();

    let current = &mr.labels;
    let desired = desired_labels(current, &peer_ids);

    // Peer labels that were present but no longer should be: these name the
    // conflicts that resolved since the previous run.
    let resolved_peer_ids: Vec<i64> = current
        .iter()
        .filter(|label| !desired.contains(*label))
        .filter_map(|label| model::parse_peer_label(label))
        .collect();

    if desired == *current {
        log::debug!("MR !{}: labels already correct", mr.id);
        outcome.unchanged += 1;
        return Ok(());
    }

    if opts.dry_run {
        log::info!(
            "dry-run: would set labels of MR !{} to {:?}",
            mr.id,
            desired.iter().collect::<Vec<_>>()
        );
        return Ok(());
    }

    if opts.update_status {
        api.update_merge_request_labels(project_id, mr.id, &desired)?;
        log::info!("updated labels of MR !{}", mr.id);
        outcome.labels_updated += 1;
    }

    if opts.create_notes {
        let mut resolved_peers: Vec<MergeRequest> = Vec::new();
        for peer_id in resolved_peer_ids {
            resolved_peers.push(api.get_merge_request(project_id, peer_id)?);
        }
        let body = report::render_note(mr.id, &relevant, &resolved_peers);
        api.create_merge_request_note(project_id, mr.id, &body)?;
        log::info!("posted conflict analysis note on MR !{}", mr.id);
        outcome.notes_posted += 1;
    }

    Ok(())
}

/// The label set the MR should carry: existing labels minus all
/// `conflict:MR*`, plus the marker and one peer label per current conflict.
fn desired_labels(current: &BTreeSet<String>, peer_ids: &BTreeSet<i64>) -> BTreeSet<String> {
    let mut desired: BTreeSet<String> = current
        .iter()
        .filter(|label| model::parse_peer_label(label).is_none())
        .cloned()
        .collect();

    if peer_ids.is_empty() {
        desired.remove(CONFLICTS_LABEL);
    } else {
        desired.insert(CONFLICTS_LABEL.to_string());
        for peer_id in peer_ids {
            desired.insert(model::peer_label(*peer_id));
        }
    }
    desired
}
