//! Rendering: the stdout conflict list and the Markdown note body posted to
//! merge requests.

use crate::gitlab::types::{MergeRequest, MergeRequestState};
use crate::model::Conflict;

const TITLE_MAX: usize = 50;
const NOTE_FILE_LIMIT: usize = 10;

/// One block per conflict, or `No conflicts detected.` for an empty list.
pub fn render_conflict_list(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "No conflicts detected.".to_string();
    }

    let mut blocks = Vec::new();
    for conflict in conflicts {
        let header = format!(
            "\"{}\" vs \"{}\"",
            display_title(&conflict.first.title),
            display_title(&conflict.second.title)
        );
        let quoted: Vec<String> = conflict.files.iter().map(|f| format!("`{f}`")).collect();
        let issue = match quoted.as_slice() {
            [only] => format!("- Issue: conflict in modification of {only}"),
            many => format!(
                "- Issue: conflicts in modification of {} files: {}",
                many.len(),
                many.join(", ")
            ),
        };
        blocks.push(format!("{header}\n{issue}"));
    }
    blocks.join("\n\n")
}

/// The Markdown note body for one MR: resolved conflicts first (keyed by the
/// peer's current state), then the still-open conflicts, then a closing line.
pub fn render_note(mr_id: i64, conflicts: &[&Conflict], resolved_peers: &[MergeRequest]) -> String {
    let mut out = String::from("## Merge Request Conflict Analysis\n");

    if !resolved_peers.is_empty() {
        out.push_str("\n#### Resolved conflicts\n\n");
        for peer in resolved_peers {
            out.push_str(&resolved_line(peer));
            out.push('\n');
        }
        out.push('\n');
    }

    if conflicts.is_empty() {
        out.push_str("\nNo more conflicts detected. All conflicts are resolved!");
        return out;
    }

    for conflict in conflicts {
        let Some(peer) = conflict.peer_of(mr_id) else {
            continue;
        };
        out.push_str(&format!(
            "\n### Conflict with MR !{} ({})\n\n",
            peer.id,
            display_title(&peer.title)
        ));
        out.push_str(&format!("- Source branch: `{}`\n", peer.source_branch));
        out.push_str(&format!("- Target branch: `{}`\n", peer.target_branch));
        out.push_str(&format!("- Reason: {}\n", conflict.reason));
        out.push_str("- Conflicting files:\n");
        for file in conflict.files.iter().take(NOTE_FILE_LIMIT) {
            out.push_str(&format!("  - `{file}`\n"));
        }
        if conflict.files.len() > NOTE_FILE_LIMIT {
            out.push_str(&format!(
                "  - ... and {} more files\n",
                conflict.files.len() - NOTE_FILE_LIMIT
            ));
        }
    }
    out.push_str("\nPlease resolve these conflicts before merging.");
    out
}

fn resolved_line(peer: &MergeRequest) -> String {
    let title = display_title(peer.title.as_deref().unwrap_or(""));
    let head = format!("- **Conflict with MR !{} ({title})**", peer.iid);
    match peer.state {
        MergeRequestState::Merged => {
            format!("{head} due to merge. Please check merge request to verify changes.")
        }
        MergeRequestState::Closed => format!("{head} due to close. Changes were declined."),
        _ => format!("{head} due to open. No more conflicts detected."),
    }
}

/// Titles are clipped to 50 characters (47 plus `...`); an empty title
/// renders as `Untitled`.
fn display_title(title: &str) -> String {
    if title.is_empty() {
        return "Untitled".to_string();
    }
    if title.chars().count() > TITLE_MAX {
        let clipped: String = title.chars().take(TITLE_MAX - 3).collect();
        format!("{clipped}...")
    } else {
        title.to_string()
    }
}
