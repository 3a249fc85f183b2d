use std::fmt;

use prlens_core::{BudgetConfig, RiskTier};
use serde::Serialize;

use crate::parser::FileChange;
use crate::risk::RiskClassifier;

/// Fixed cost of a file's headers.
pub const PER_FILE_OVERHEAD: usize = 8;
/// Fixed cost of a hunk header.
pub const PER_HUNK_OVERHEAD: usize = 4;

/// Estimated token cost of one file: `Σ ceil(len / 4)` over body lines plus overhead.
///
/// Line length is measured in UTF-8 bytes, so multi-byte text is overestimated.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::parse_unified_diff;
/// use prlens_difflens::truncate::estimate_tokens;
///
/// let files = parse_unified_diff("--- a/f\n+++ b/f\n@@ -1 +1 @@\n-abcde\n+x\n");
/// // 8 (file) + 4 (hunk) + 2 ("abcde") + 1 ("x")
/// assert_eq!(estimate_tokens(&files[0]), 15);
/// ```
pub fn estimate_tokens(file: &FileChange) -> usize {
    let body: usize = file
        .hunks
        .iter()
        .flat_map(|h| &h.lines)
        .map(|l| l.text.len().div_ceil(4))
        .sum();
    PER_FILE_OVERHEAD + PER_HUNK_OVERHEAD * file.hunks.len() + body
}

/// Fits a file list into a token budget, dropping the least important tiers first.
///
/// Selection is greedy: files are ordered by `(tier priority, token count)` and
/// accepted while the running total stays within budget. A file that would
/// overflow is dropped whole and the pass continues with the next one.
///
/// # Examples
///
/// ```
/// use prlens_difflens::parser::parse_unified_diff;
/// use prlens_difflens::risk::RiskClassifier;
/// use prlens_difflens::truncate::TokenBudgetTruncator;
///
/// let diff = "--- a/README.md\n+++ b/README.md\n@@ -1 +1 @@\n-a\n+b\n\
///             --- a/src/auth.rs\n+++ b/src/auth.rs\n@@ -1 +1 @@\n-a\n+b\n";
/// let truncator = TokenBudgetTruncator::new(15);
/// let result = truncator.truncate(parse_unified_diff(diff), &RiskClassifier::default());
/// assert_eq!(result.files.len(), 1);
/// assert_eq!(result.files[0].new_path, "src/auth.rs");
/// assert_eq!(result.dropped, vec!["README.md"]);
/// ```
#[derive(Debug, Clone)]
pub struct TokenBudgetTruncator {
    max_tokens: usize,
    priority: Vec<RiskTier>,
}

impl TokenBudgetTruncator {
    /// Truncator keeping high, then medium, then low risk files.
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            priority: RiskTier::ALL.to_vec(),
        }
    }

    /// Truncator from the `[budget]` configuration section.
    pub fn from_config(config: &BudgetConfig) -> Self {
        Self::new(config.max_tokens).with_priority(config.priority.clone())
    }

    /// Override the keep-order, most important tier first. Unlisted tiers rank last.
    pub fn with_priority(mut self, priority: Vec<RiskTier>) -> Self {
        self.priority = priority;
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    fn priority_index(&self, tier: RiskTier) -> usize {
        self.priority
            .iter()
            .position(|t| *t == tier)
            .unwrap_or(self.priority.len())
    }

    /// Select the files to keep and report what was dropped.
    pub fn truncate(&self, files: Vec<FileChange>, risk: &RiskClassifier) -> TruncationResult {
        let mut candidates: Vec<(usize, usize, FileChange)> = files
            .into_iter()
            .map(|f| {
                let tier = risk.assess_path(f.path()).tier;
                (self.priority_index(tier), estimate_tokens(&f), f)
            })
            .collect();
        candidates.sort_by_key(|(priority, tokens, _)| (*priority, *tokens));

        let mut kept = Vec::new();
        let mut dropped = Vec::new();
        let mut used = 0;

        for (_, tokens, file) in candidates {
            if used + tokens <= self.max_tokens {
                used += tokens;
                kept.push(file);
            } else {
                tracing::debug!(
                    path = file.path(),
                    tokens,
                    used,
                    budget = self.max_tokens,
                    "dropping file over token budget"
                );
                dropped.push(file.path().to_string());
            }
        }

        TruncationResult {
            files: kept,
            dropped,
            total_tokens: used,
            max_tokens: self.max_tokens,
        }
    }
}

/// Files that fit the budget, in priority order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationResult {
    /// Kept files, most important tier first.
    pub files: Vec<FileChange>,
    /// Paths of files dropped to fit the budget.
    pub dropped: Vec<String>,
    /// Estimated tokens of the kept files.
    pub total_tokens: usize,
    /// The budget that was applied.
    pub max_tokens: usize,
}

impl TruncationResult {
    /// Whether any file was dropped.
    pub fn is_truncated(&self) -> bool {
        !self.dropped.is_empty()
    }
}

impl fmt::Display for TruncationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files kept, {} dropped (~{}/{} tokens)",
            self.files.len(),
            self.dropped.len(),
            self.total_tokens,
            self.max_tokens
        )
    }
}
