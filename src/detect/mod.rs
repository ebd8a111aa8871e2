//! Drives the configured strategies across every pair of open MRs.

pub mod strategy;

use std::collections::BTreeSet;

use crate::model::{Conflict, MergeRequestSummary};
use crate::pattern::IgnoreRules;
use strategy::{ConflictStrategy, FileOverlapStrategy};

pub struct Detector {
    strategies: Vec<Box<dyn ConflictStrategy>>,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            strategies: vec![Box::new(FileOverlapStrategy)],
        }
    }
}

impl Detector {
    pub fn with_strategies(strategies: Vec<Box<dyn ConflictStrategy>>) -> Self {
        Self { strategies }
    }

    /// Visit every unordered pair exactly once, dedupe by the canonical pair
    /// key, and return the conflicts sorted by `(first.id, second.id)`.
    pub fn detect(&self, mrs: &[MergeRequestSummary], ignore: &IgnoreRules) -> Vec<Conflict> {
        let mut seen: BTreeSet<(i64, i64)> = BTreeSet::new();
        let mut conflicts = Vec::new();

        for (i, a) in mrs.iter().enumerate() {
            for b in &mrs[i + 1..] {
                for strategy in &self.strategies {
                    if let Some(conflict) = strategy.decide(a, b, ignore) {
                        log::debug!(
                            "{}: MR !{} vs MR !{} conflict on {} file(s)",
                            strategy.name(),
                            conflict.first.id,
                            conflict.second.id,
                            conflict.files.len()
                        );
                        if seen.insert(conflict.pair()) {
                            conflicts.push(conflict);
                        }
                    }
                }
            }
        }

        conflicts.sort();
        conflicts
    }
}

/// Every MR id that appears in at least one conflict.
pub fn conflicting_ids(conflicts: &[Conflict]) -> BTreeSet<i64> {
    conflicts
        .iter()
        .flat_map(|c| [c.first.id, c.second.id])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConflictReason;

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

    #[test]
    fn test_detect_finds_all_pairs_sorted() {
        let mrs = vec![
            mr(3, "c", "main", &["shared.txt"]),
            mr(1, "a", "main", &["shared.txt"]),
            mr(2, "b", "main", &["shared.txt"]),
        ];
        let conflicts = Detector::default().detect(&mrs, &IgnoreRules::default());
        let pairs: Vec<(i64, i64)> = conflicts.iter().map(|c| c.pair()).collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_detect_empty_input() {
        let conflicts = Detector::default().detect(&[], &IgnoreRules::default());
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_detect_single_mr_never_conflicts() {
        let mrs = vec![mr(1, "a", "main", &["x.txt"])];
        assert!(Detector::default()
            .detect(&mrs, &IgnoreRules::default())
            .is_empty());
    }

    #[test]
    fn test_duplicate_strategies_dedupe_by_pair() {
        let detector = Detector::with_strategies(vec![
            Box::new(strategy::FileOverlapStrategy),
            Box::new(strategy::FileOverlapStrategy),
        ]);
        let mrs = vec![
            mr(1, "a", "main", &["x.txt"]),
            mr(2, "b", "main", &["x.txt"]),
        ];
        let conflicts = detector.detect(&mrs, &IgnoreRules::default());
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].reason, ConflictReason::DirectConflict);
    }

    #[test]
    fn test_conflicting_ids_union() {
        let mrs = vec![
            mr(1, "a", "main", &["x.txt"]),
            mr(2, "b", "main", &["x.txt"]),
            mr(5, "c", "main", &["unrelated.txt"]),
        ];
        let conflicts = Detector::default().detect(&mrs, &IgnoreRules::default());
        let ids = conflicting_ids(&conflicts);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
