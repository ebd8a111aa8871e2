//! Raw GitLab REST payload types. Only the fields the tool reads are kept;
//! everything else in the responses is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    Opened,
    Merged,
    Closed,
    Locked,
    #[serde(other)]
    Unknown,
}

/// One merge request as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub iid: i64,
    #[serde(default)]
    pub title: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    pub state: MergeRequestState,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub draft: bool,
    /// Servers older than GitLab 14 report draft status under this name.
    #[serde(default)]
    pub work_in_progress: bool,
}

impl MergeRequest {
    pub fn is_draft(&self) -> bool {
        self.draft || self.work_in_progress
    }
}

/// One entry of the `changes` array of a merge request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub old_path: String,
    pub new_path: String,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
    #[serde(default)]
    pub new_file: bool,
}

/// Wrapper payload of `GET /projects/:id/merge_requests/:iid/changes`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MergeRequestChanges {
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

/// Project payload; fetched only to probe token access.
#[derive(Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub path_with_namespace: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_request_deserializes_minimal_payload() {
        let json = r#"{
            "iid": 5,
            "title": "Add login",
            "source_branch": "feat-login",
            "target_branch": "main",
            "state": "opened"
        }"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.iid, 5);
        assert_eq!(mr.state, MergeRequestState::Opened);
        assert!(mr.labels.is_empty());
        assert!(!mr.is_draft());
    }

    #[test]
    fn test_merge_request_legacy_wip_counts_as_draft() {
        let json = r#"{
            "iid": 9,
            "source_branch": "wip",
            "target_branch": "main",
            "state": "opened",
            "work_in_progress": true
        }"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert!(mr.is_draft());
        assert_eq!(mr.title, None);
    }

    #[test]
    fn test_unknown_state_does_not_fail() {
        let json = r#"{
            "iid": 1,
            "source_branch": "a",
            "target_branch": "b",
            "state": "something-new"
        }"#;
        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.state, MergeRequestState::Unknown);
    }

    #[test]
    fn test_changes_wrapper_defaults_to_empty() {
        let changes: MergeRequestChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.changes.is_empty());
    }
}
