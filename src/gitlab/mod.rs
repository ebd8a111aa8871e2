//! GitLab platform adapter: the operation contract the engine consumes, the
//! REST client implementing it, and a run-scoped response cache.

pub mod cache;
pub mod client;
pub mod types;

pub use client::GitLabClient;

use std::collections::BTreeSet;

use crate::error::Result;
use types::{FileChange, MergeRequest};

/// The platform operations the engine needs. The detection and
/// reconciliation code only ever sees this trait, so tests drive them with
/// in-memory fakes and the real client stays at the edge.
pub trait GitLabApi {
    /// Probe whether the token can see the project at all. A 403 or 404 is
    /// a clean "no"; anything else unexpected is an error.
    fn has_project_access(&self, project_id: i64) -> Result<bool>;

    /// All merge requests currently open in the project.
    fn list_open_merge_requests(&self, project_id: i64) -> Result<Vec<MergeRequest>>;

    /// One merge request regardless of state; also used to look up the
    /// current state of a resolved conflict peer.
    fn get_merge_request(&self, project_id: i64, iid: i64) -> Result<MergeRequest>;

    /// The file-change records of one merge request.
    fn get_merge_request_changes(&self, project_id: i64, iid: i64) -> Result<Vec<FileChange>>;

    /// Replace the full label set of a merge request.
    fn update_merge_request_labels(
        &self,
        project_id: i64,
        iid: i64,
        labels: &BTreeSet<String>,
    ) -> Result<()>;

    /// Append a Markdown comment to a merge request.
    fn create_merge_request_note(&self, project_id: i64, iid: i64, body: &str) -> Result<()>;
}
