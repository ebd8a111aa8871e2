//! Ignore-pattern matching for changed-file paths.
//!
//! Patterns come in three shapes: a trailing `/` marks a directory pattern
//! (the directory itself and everything under it), a leading `!` inverts the
//! rest, and anything else is a conventional glob (`?` and `*` stop at `/`,
//! `**` crosses segments, `[...]` classes work). Both sides are normalized
//! first so `\` separators and a leading `/` never affect the outcome.

use glob::{MatchOptions, Pattern};

/// The configured ignore list plus the global case-sensitivity mode.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<String>,
    case_insensitive: bool,
}

impl IgnoreRules {
    pub fn new(patterns: Vec<String>, case_insensitive: bool) -> Self {
        Self {
            patterns,
            case_insensitive,
        }
    }

    /// True if any configured pattern matches; stops at the first hit.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| matches(pattern, path, self.case_insensitive))
    }
}

/// Decide whether one pattern matches one path.
pub fn matches(pattern: &str, path: &str, case_insensitive: bool) -> bool {
    if pattern.is_empty() || path.is_empty() {
        return false;
    }

    // Negation applies to the raw pattern; an empty body matches nothing.
    if let Some(body) = pattern.strip_prefix('!') {
        if body.is_empty() {
            return false;
        }
        return !matches(body, path, case_insensitive);
    }

    let pattern = normalize(pattern, case_insensitive);
    let path = normalize(path, case_insensitive);
    if pattern.is_empty() || path.is_empty() {
        return false;
    }

    if pattern == path {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix('/') {
        return path == prefix || path.starts_with(&format!("{prefix}/"));
    }

    let options = MatchOptions {
        case_sensitive: !case_insensitive,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    match Pattern::new(&pattern) {
        Ok(glob) => glob.matches_with(&path, options),
        Err(err) => {
            log::debug!("ignoring unparseable pattern {pattern:?}: {err}");
            false
        }
    }
}

/// Unify separator style: backslashes become `/`, one leading `/` is
/// stripped, and case is folded iff the matcher is case-insensitive.
fn normalize(s: &str, fold_case: bool) -> String {
    let unified = s.replace('\\', "/");
    let trimmed = unified.strip_prefix('/').unwrap_or(&unified);
    if fold_case {
        trimmed.to_lowercase()
    } else {
        trimmed.to_string()
    }
}
