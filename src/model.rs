//! Core data model: merge request summaries, detected conflicts, and the
//! label convention used to persist analysis state on GitLab.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::gitlab::types::{FileChange, MergeRequest};

/// Marker label carried by any MR that currently conflicts with another.
pub const CONFLICTS_LABEL: &str = "conflicts";

/// Prefix of the per-peer label; the full label reads `conflict:MR<iid>`.
pub const CONFLICT_MR_PREFIX: &str = "conflict:MR";

/// Diff sentinel GitLab uses for created/deleted sides; never a real path.
const DEV_NULL: &str = "/dev/null";

/// Render the label naming one conflicting counterpart.
pub fn peer_label(iid: i64) -> String {
    format!("{CONFLICT_MR_PREFIX}{iid}")
}

/// Extract the peer IID from a `conflict:MR<iid>` label.
/// Returns `None` for anything else, including non-numeric suffixes.
pub fn parse_peer_label(label: &str) -> Option<i64> {
    label
        .strip_prefix(CONFLICT_MR_PREFIX)?
        .parse::<i64>()
        .ok()
        .filter(|iid| *iid > 0)
}

/// Immutable view of one open merge request as consumed by the engine.
///
/// Equality and hashing depend only on `id`: the IID is stable within a
/// project and two snapshots of the same MR describe the same entity.
#[derive(Debug, Clone)]
pub struct MergeRequestSummary {
    pub id: i64,
    pub title: String,
    pub source_branch: String,
    pub target_branch: String,
    pub changed_files: BTreeSet<String>,
    pub labels: BTreeSet<String>,
    pub draft: bool,
}

impl MergeRequestSummary {
    /// Build a summary from the raw MR payload and its change records.
    pub fn from_api(mr: &MergeRequest, changes: &[FileChange]) -> Self {
        Self {
            id: mr.iid,
            title: mr.title.clone().unwrap_or_default(),
            source_branch: mr.source_branch.clone(),
            target_branch: mr.target_branch.clone(),
            changed_files: changed_files_from(changes),
            labels: mr.labels.iter().cloned().collect(),
            draft: mr.is_draft(),
        }
    }
}

/// Collect the set of paths an MR touches. A rename counts on both sides so
/// overlap with either name is caught; a deletion keeps the old path. Empty
/// paths and the `/dev/null` sentinel never enter the set.
fn changed_files_from(changes: &[FileChange]) -> BTreeSet<String> {
    let mut files = BTreeSet::new();
    for change in changes {
        for path in [change.old_path.as_str(), change.new_path.as_str()] {
            if !path.is_empty() && path != DEV_NULL {
                files.insert(path.to_string());
            }
        }
    }
    files
}

impl PartialEq for MergeRequestSummary {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MergeRequestSummary {}

impl Hash for MergeRequestSummary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Why a pair of MRs was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictReason {
    /// Both MRs merge into the same target branch.
    DirectConflict,
    /// The MRs merge into different branches but touch the same files.
    CrossBranchConflict,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::DirectConflict => write!(f, "DirectConflict"),
            ConflictReason::CrossBranchConflict => write!(f, "CrossBranchConflict"),
        }
    }
}

/// A likely merge conflict between exactly two MRs.
///
/// The pair is stored in canonical order (`first.id < second.id`); equality
/// and ordering look only at the id pair, so a swapped detection of the same
/// two MRs dedupes away.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub first: MergeRequestSummary,
    pub second: MergeRequestSummary,
    /// Common, non-ignored paths. Never empty for an emitted conflict.
    pub files: BTreeSet<String>,
    pub reason: ConflictReason,
}

impl Conflict {
    pub fn new(
        a: MergeRequestSummary,
        b: MergeRequestSummary,
        files: BTreeSet<String>,
        reason: ConflictReason,
    ) -> Self {
        let (first, second) = if a.id <= b.id { (a, b) } else { (b, a) };
        Self {
            first,
            second,
            files,
            reason,
        }
    }

    /// Canonical `(first.id, second.id)` key.
    pub fn pair(&self) -> (i64, i64) {
        (self.first.id, self.second.id)
    }

    pub fn involves(&self, id: i64) -> bool {
        self.first.id == id || self.second.id == id
    }

    /// The other side of the pair, if `id` is part of it.
    pub fn peer_of(&self, id: i64) -> Option<&MergeRequestSummary> {
        if self.first.id == id {
            Some(&self.second)
        } else if self.second.id == id {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl PartialEq for Conflict {
    fn eq(&self, other: &Self) -> bool {
        self.pair() == other.pair()
    }
}

impl Eq for Conflict {}

impl Hash for Conflict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pair().hash(state);
    }
}

impl PartialOrd for Conflict {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Conflict {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.pair().cmp(&other.pair())
    }
}
