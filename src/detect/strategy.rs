//! Pairwise conflict decision.

use std::collections::BTreeSet;

use crate::model::{Conflict, ConflictReason, MergeRequestSummary};
use crate::pattern::IgnoreRules;

/// One way of deciding whether two MRs conflict. Implementations must be
/// deterministic, side-effect-free, and symmetric in their arguments.
pub trait ConflictStrategy {
    fn name(&self) -> &'static str;

    fn decide(
        &self,
        a: &MergeRequestSummary,
        b: &MergeRequestSummary,
        ignore: &IgnoreRules,
    ) -> Option<Conflict>;
}

/// File-overlap detection with branch-dependency suppression.
pub struct FileOverlapStrategy;

impl ConflictStrategy for FileOverlapStrategy {
    fn name(&self) -> &'static str {
        "file-overlap"
    }

    fn decide(
        &self,
        a: &MergeRequestSummary,
        b: &MergeRequestSummary,
        ignore: &IgnoreRules,
    ) -> Option<Conflict> {
        // One MR targeting the other's source branch merges in an implied
        // order; overlap between the two resolves itself along the chain.
        if a.target_branch == b.source_branch || b.target_branch == a.source_branch {
            log::debug!(
                "MR !{} and MR !{} form a dependency chain, skipping",
                a.id,
                b.id
            );
            return None;
        }

        if a.changed_files.is_empty() || b.changed_files.is_empty() {
            return None;
        }

        // Cheap rejection before the set intersection: no shared top-level
        // directory means no shared path.
        if !share_top_level_dir(a, b) {
            return None;
        }

        let (small, large) = if a.changed_files.len() <= b.changed_files.len() {
            (&a.changed_files, &b.changed_files)
        } else {
            (&b.changed_files, &a.changed_files)
        };
        let common: BTreeSet<String> = small
            .iter()
            .filter(|file| large.contains(*file))
            .cloned()
            .collect();
        if common.is_empty() {
            return None;
        }

        let files: BTreeSet<String> = common
            .into_iter()
            .filter(|file| !ignore.is_ignored(file))
            .collect();
        if files.is_empty() {
            return None;
        }

        let reason = if a.target_branch == b.target_branch {
            ConflictReason::DirectConflict
        } else {
            ConflictReason::CrossBranchConflict
        };
        Some(Conflict::new(a.clone(), b.clone(), files, reason))
    }
}

/// The path segment before the first `/`, or the whole path.
fn top_level(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

fn share_top_level_dir(a: &MergeRequestSummary, b: &MergeRequestSummary) -> bool {
    let dirs: BTreeSet<&str> = a.changed_files.iter().map(|f| top_level(f)).collect();
    b.changed_files.iter().any(|f| dirs.contains(top_level(f)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mr(id: i64, source: &str, target: &str, files: &[&str]) -> MergeRequestSummary {
        MergeRequestSummary {
            id,
            title: format!("MR{id}"),
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            changed_files: files.iter().map(|f| f.to_string()).collect(),
            labels: BTreeSet::new(),
            draft: false,
        }
    }

    fn no_ignore() -> IgnoreRules {
        IgnoreRules::default()
    }

    #[test]
    fn test_same_target_overlap_is_direct_conflict() {
        let a = mr(1, "feat-auth", "main", &["src/app.js", "tests/unit.test.js"]);
        let b = mr(2, "feat-ui", "main", &["src/app.js", "makefile"]);
        let ignore = IgnoreRules::new(vec!["temp/".to_string(), "makefile".to_string()], false);

        let conflict = FileOverlapStrategy.decide(&a, &b, &ignore).unwrap();
        assert_eq!(conflict.pair(), (1, 2));
        assert_eq!(conflict.reason, ConflictReason::DirectConflict);
        assert_eq!(
            conflict.files.iter().collect::<Vec<_>>(),
            vec!["src/app.js"]
        );
    }

    #[test]
    fn test_dependency_chain_suppresses_conflict() {
        let a = mr(1, "feat-auth", "main", &["tests/unit.test.js"]);
        let b = mr(3, "hotfix", "feat-auth", &["tests/unit.test.js"]);
        assert!(FileOverlapStrategy.decide(&a, &b, &no_ignore()).is_none());
        assert!(FileOverlapStrategy.decide(&b, &a, &no_ignore()).is_none());
    }

    #[test]
    fn test_ignore_can_eliminate_all_overlap() {
        let a = mr(2, "feat-make", "main", &["makefile"]);
        let b = mr(7, "chore-make", "main", &["makefile"]);
        let ignore = IgnoreRules::new(vec!["makefile".to_string()], false);
        assert!(FileOverlapStrategy.decide(&a, &b, &ignore).is_none());
    }

    #[test]
    fn test_different_targets_give_cross_branch_reason() {
        let a = mr(5, "new-values", "feat-auth", &["src/consts.js"]);
        let b = mr(6, "const-update", "main", &["src/consts.js"]);
        let conflict = FileOverlapStrategy.decide(&a, &b, &no_ignore()).unwrap();
        assert_eq!(conflict.reason, ConflictReason::CrossBranchConflict);
        assert_eq!(
            conflict.files.iter().collect::<Vec<_>>(),
            vec!["src/consts.js"]
        );
    }

    #[test]
    fn test_no_overlap_no_conflict() {
        let a = mr(1, "x", "main", &["src/a.js"]);
        let b = mr(2, "y", "main", &["src/b.js"]);
        assert!(FileOverlapStrategy.decide(&a, &b, &no_ignore()).is_none());
    }

    #[test]
    fn test_empty_change_set_no_conflict() {
        let a = mr(1, "x", "main", &[]);
        let b = mr(2, "y", "main", &["src/b.js"]);
        assert!(FileOverlapStrategy.decide(&a, &b, &no_ignore()).is_none());
    }

    #[test]
    fn test_decision_is_symmetric() {
        let a = mr(4, "x", "main", &["src/a.js", "src/shared.js", "docs/x.md"]);
        let b = mr(9, "y", "develop", &["src/shared.js", "docs/x.md"]);

        let ab = FileOverlapStrategy.decide(&a, &b, &no_ignore()).unwrap();
        let ba = FileOverlapStrategy.decide(&b, &a, &no_ignore()).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.pair(), (4, 9));
        assert_eq!(ab.files, ba.files);
        assert_eq!(ab.reason, ba.reason);
    }

    #[test]
    fn test_adding_a_pattern_never_grows_the_file_set() {
        let a = mr(1, "x", "main", &["src/a.js", "src/b.js"]);
        let b = mr(2, "y", "main", &["src/a.js", "src/b.js"]);

        let base = FileOverlapStrategy
            .decide(&a, &b, &no_ignore())
            .unwrap()
            .files;
        let narrowed = IgnoreRules::new(vec!["src/b.js".to_string()], false);
        let filtered = FileOverlapStrategy.decide(&a, &b, &narrowed).unwrap().files;
        assert!(filtered.is_subset(&base));
    }

    #[test]
    fn test_top_level_helper() {
        assert_eq!(top_level("src/app.js"), "src");
        assert_eq!(top_level("makefile"), "makefile");
        assert_eq!(top_level("a/b/c"), "a");
    }
}
