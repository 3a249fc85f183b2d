//! Pre-LLM file filtering and diff text reconstruction.
//!
//! Filters out lock files, non-code assets and, on request, tests and
//! configuration before the diff reaches the prompt, saving tokens and
//! keeping risk scores focused on reviewable code.

use std::fmt::Write;

use prlens_core::{ChangeType, SanitizeConfig};
use serde::Serialize;

use crate::classify::{PathCategory, PathClassifier};
use crate::parser::FileChange;

/// Drops files by category before analysis.
///
/// Each toggle is checked independently, so the kept set is the intersection
/// of what every enabled toggle keeps and sanitizing twice changes nothing.
///
/// # Examples
///
/// ```
/// use prlens_core::SanitizeConfig;
/// use prlens_difflens::sanitize::DiffSanitizer;
///
/// let sanitizer = DiffSanitizer::new(SanitizeConfig::default());
/// assert!(sanitizer.exclusion_for("yarn.lock", false).is_some());
/// assert!(sanitizer.exclusion_for("src/main.rs", false).is_none());
/// // tests are kept unless asked for
/// assert!(sanitizer.exclusion_for("tests/api.rs", false).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct DiffSanitizer {
    options: SanitizeConfig,
    classifier: PathClassifier,
}

impl DiffSanitizer {
    /// Sanitizer with the built-in path rules.
    pub fn new(options: SanitizeConfig) -> Self {
        Self::with_classifier(options, PathClassifier::new())
    }

    /// Sanitizer sharing an already configured classifier.
    pub fn with_classifier(options: SanitizeConfig, classifier: PathClassifier) -> Self {
        Self {
            options,
            classifier,
        }
    }

    /// Why `path` would be excluded, if it would be.
    pub fn exclusion_for(&self, path: &str, is_binary: bool) -> Option<ExcludedFile> {
        let toggles = [
            (self.options.exclude_lockfiles, PathCategory::Lockfile),
            (self.options.exclude_non_code_assets, PathCategory::NonCodeAsset),
            (self.options.exclude_tests, PathCategory::Test),
            (self.options.exclude_configs, PathCategory::Config),
        ];

        if is_binary && self.options.exclude_non_code_assets {
            return Some(ExcludedFile {
                path: path.to_string(),
                category: PathCategory::NonCodeAsset,
                reason: "binary file".into(),
            });
        }

        toggles
            .iter()
            .filter(|(enabled, _)| *enabled)
            .find_map(|(_, category)| self.classifier.classify(*category, path))
            .map(|hit| ExcludedFile {
                path: path.to_string(),
                category: hit.category,
                reason: hit.reason,
            })
    }

    /// Split `files` into kept and excluded, preserving the order of kept files.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_core::SanitizeConfig;
    /// use prlens_difflens::parser::parse_unified_diff;
    /// use prlens_difflens::sanitize::DiffSanitizer;
    ///
    /// let diff = "diff --git a/src/main.rs b/src/main.rs\n\
    ///             --- a/src/main.rs\n\
    ///             +++ b/src/main.rs\n\
    ///             @@ -1 +1,2 @@\n\
    ///              line\n\
    ///             +new\n\
    ///             diff --git a/Cargo.lock b/Cargo.lock\n\
    ///             --- a/Cargo.lock\n\
    ///             +++ b/Cargo.lock\n\
    ///             @@ -1 +1 @@\n\
    ///             -a\n\
    ///             +b\n";
    /// let sanitizer = DiffSanitizer::new(SanitizeConfig::default());
    /// let result = sanitizer.sanitize(parse_unified_diff(diff));
    /// assert_eq!(result.kept.len(), 1);
    /// assert_eq!(result.excluded[0].path, "Cargo.lock");
    /// ```
    pub fn sanitize(&self, files: Vec<FileChange>) -> SanitizeResult {
        let mut kept = Vec::new();
        let mut excluded = Vec::new();

        for file in files {
            match self.exclusion_for(file.path(), file.is_binary) {
                Some(skip) => {
                    tracing::debug!(path = %skip.path, reason = %skip.reason, "excluding file");
                    excluded.push(skip);
                }
                None => kept.push(file),
            }
        }

        SanitizeResult { kept, excluded }
    }
}

/// Result of sanitizing a file list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanitizeResult {
    /// Files that passed every enabled filter.
    pub kept: Vec<FileChange>,
    /// Files that were dropped, with reasons.
    pub excluded: Vec<ExcludedFile>,
}

/// A file dropped by the sanitizer.
///
/// # Examples
///
/// ```
/// use prlens_difflens::classify::PathCategory;
/// use prlens_difflens::sanitize::ExcludedFile;
///
/// let skipped = ExcludedFile {
///     path: "package-lock.json".into(),
///     category: PathCategory::Lockfile,
///     reason: "npm lock file".into(),
/// };
/// assert_eq!(skipped.to_string(), "package-lock.json (lock file: npm lock file)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcludedFile {
    pub path: String,
    pub category: PathCategory,
    pub reason: String,
}

impl std::fmt::Display for ExcludedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}: {})", self.path, self.category, self.reason)
    }
}

/// Regenerate canonical `git diff` text from parsed files.
///
/// Headers are normalized; every body line is written back with its marker
/// and original text, so `parse_unified_diff(&reconstruct(&files)) == files`.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::parse_unified_diff;
/// use prlens_difflens::sanitize::reconstruct;
///
/// let diff = "--- a/f.rs\n+++ b/f.rs\n@@ -1 +1 @@\n-old\n+new\n";
/// let text = reconstruct(&parse_unified_diff(diff));
/// assert!(text.starts_with("diff --git a/f.rs b/f.rs\n"));
/// assert!(text.contains("\n-old\n+new\n"));
/// ```
pub fn reconstruct(files: &[FileChange]) -> String {
    let mut text = String::new();
    for file in files {
        let _ = writeln!(text, "diff --git a/{} b/{}", file.old_path, file.new_path);
        match file.change_type {
            ChangeType::Add => text.push_str("new file mode 100644\n"),
            ChangeType::Delete => text.push_str("deleted file mode 100644\n"),
            ChangeType::Rename => {
                let _ = writeln!(text, "rename from {}", file.old_path);
                let _ = writeln!(text, "rename to {}", file.new_path);
            }
            ChangeType::Modify => {}
        }

        if file.is_binary {
            let _ = writeln!(
                text,
                "Binary files a/{} and b/{} differ",
                file.old_path, file.new_path
            );
        }

        if file.hunks.is_empty() {
            continue;
        }

        let old = if file.change_type == ChangeType::Add {
            "/dev/null".to_string()
        } else {
            format!("a/{}", file.old_path)
        };
        let new = if file.change_type == ChangeType::Delete {
            "/dev/null".to_string()
        } else {
            format!("b/{}", file.new_path)
        };
        let _ = writeln!(text, "--- {old}");
        let _ = writeln!(text, "+++ {new}");

        for hunk in &file.hunks {
            let _ = write!(
                text,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines
            );
            if !hunk.section.is_empty() {
                let _ = write!(text, " {}", hunk.section);
            }
            text.push('\n');
            for line in &hunk.lines {
                text.push(line.kind.marker());
                text.push_str(&line.text);
                text.push('\n');
            }
        }
    }
    text
}
