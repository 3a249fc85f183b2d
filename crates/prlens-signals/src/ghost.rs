use std::fmt;

use prlens_core::{CommitRecord, GhostConfig, PrlensError};
use regex::Regex;
use serde::Serialize;

/// Default minimum share of message keywords that must appear in the diff.
pub const DEFAULT_SENSITIVITY: f64 = 0.3;

/// Missing keywords listed in a finding's reason.
const MAX_REPORTED_MISSING: usize = 8;

/// Words that say nothing about what a diff touches, including the usual commit verbs.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "this", "that", "from", "into", "onto", "was", "were", "are",
    "has", "have", "had", "been", "being", "will", "should", "would", "could", "can", "not",
    "but", "its", "also", "when", "then", "than", "some", "more", "all", "any", "via", "per",
    "now", "just", "too", "very", "only", "out", "our", "your", "their", "them", "they",
    "fix", "fixes", "fixed", "fixing", "update", "updates", "updated", "updating", "add",
    "adds", "added", "adding", "remove", "removes", "removed", "removing", "change", "changes",
    "changed", "changing", "refactor", "refactored", "refactoring", "cleanup", "clean",
    "cleaned", "improve", "improved", "improves", "improvement", "improvements", "tweak",
    "tweaks", "minor", "small", "misc", "wip", "merge", "merged", "branch", "commit", "bump",
    "bumped", "make", "makes", "made", "use", "uses", "used", "using", "code", "file", "files",
    "stuff", "things", "less", "issue", "issues", "work", "working",
];

/// Result of checking one commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostFinding {
    pub sha: String,
    pub message: String,
    /// Whether the message looks unrelated to the diff.
    pub detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Share of message keywords found in the diff, when it could be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_ratio: Option<f64>,
}

impl GhostFinding {
    fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Findings for a batch of commits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostReport {
    pub findings: Vec<GhostFinding>,
    pub any_detected: bool,
}

impl GhostReport {
    /// Findings flagged as ghost commits.
    pub fn detected(&self) -> impl Iterator<Item = &GhostFinding> {
        self.findings.iter().filter(|f| f.detected)
    }

    /// Render as a markdown section listing flagged commits.
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("## Ghost Commits\n\n");
        if !self.any_detected {
            md.push_str("No ghost commits detected.\n");
            return md;
        }
        for finding in self.detected() {
            md.push_str(&format!("- `{}` {}", finding.short_sha(), finding.subject()));
            if let Some(reason) = &finding.reason {
                md.push_str(&format!(": {reason}"));
            }
            md.push('\n');
        }
        md
    }
}

impl fmt::Display for GhostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.detected().count();
        writeln!(
            f,
            "{} commits checked, {} ghost commit{}",
            self.findings.len(),
            count,
            if count == 1 { "" } else { "s" }
        )?;
        for finding in self.detected() {
            write!(f, "  {} {}", finding.short_sha(), finding.subject())?;
            if let Some(reason) = &finding.reason {
                write!(f, " ({reason})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Flags commits whose message shares too few keywords with their diff.
///
/// # Examples
///
/// ```
/// use prlens_core::CommitRecord;
/// use prlens_signals::ghost::GhostCommitDetector;
///
/// let detector = GhostCommitDetector::new(0.3).unwrap();
/// let commit = CommitRecord {
///     sha: "abc1234".into(),
///     message: "Add invoice cache".into(),
///     diff: Some("+let invoice = Invoice::load(id);\n+let cache = Cache::new();".into()),
/// };
/// let finding = detector.detect(&commit);
/// assert!(!finding.detected);
/// ```
#[derive(Debug, Clone)]
pub struct GhostCommitDetector {
    sensitivity: f64,
}

impl Default for GhostCommitDetector {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl GhostCommitDetector {
    /// Detector with the given threshold, which must lie in `[0, 1]`.
    pub fn new(sensitivity: f64) -> prlens_core::Result<Self> {
        if !(0.0..=1.0).contains(&sensitivity) {
            return Err(PrlensError::Config(format!(
                "ghost sensitivity must be between 0 and 1, got {sensitivity}"
            )));
        }
        Ok(Self { sensitivity })
    }

    pub fn from_config(config: &GhostConfig) -> prlens_core::Result<Self> {
        Self::new(config.sensitivity)
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    /// Check one commit against its own diff.
    pub fn detect(&self, commit: &CommitRecord) -> GhostFinding {
        let finding = |detected, reason: Option<String>, match_ratio| GhostFinding {
            sha: commit.sha.clone(),
            message: commit.message.clone(),
            detected,
            reason,
            match_ratio,
        };

        let diff = match commit.diff.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => return finding(false, Some("No diff available for commit".into()), None),
        };

        let keywords = extract_keywords(&commit.message);
        if keywords.is_empty() {
            return finding(
                false,
                Some("No meaningful keywords in commit message".into()),
                None,
            );
        }

        let (found, missing): (Vec<&String>, Vec<&String>) =
            keywords.iter().partition(|kw| contains_word(diff, kw));
        let ratio = found.len() as f64 / keywords.len() as f64;
        let detected = ratio < self.sensitivity;

        tracing::trace!(
            sha = %commit.sha,
            matched = found.len(),
            total = keywords.len(),
            ratio,
            "ghost keyword check"
        );

        let reason = detected.then(|| {
            let listed: Vec<&str> = missing
                .iter()
                .take(MAX_REPORTED_MISSING)
                .map(|s| s.as_str())
                .collect();
            format!(
                "{:.0}% of message keywords found in diff; missing: {}",
                ratio * 100.0,
                listed.join(", ")
            )
        });
        finding(detected, reason, Some(ratio))
    }

    /// Check every commit and aggregate.
    pub fn detect_all(&self, commits: &[CommitRecord]) -> GhostReport {
        let findings: Vec<GhostFinding> = commits.iter().map(|c| self.detect(c)).collect();
        let any_detected = findings.iter().any(|f| f.detected);
        GhostReport {
            findings,
            any_detected,
        }
    }
}

/// Lowercased message keywords in first-occurrence order.
///
/// # Examples
///
/// ```
/// use prlens_signals::ghost::extract_keywords;
///
/// let kws = extract_keywords("Fix the OAuth token-refresh bug in oauth client");
/// assert_eq!(kws, vec!["oauth", "token", "refresh", "bug", "client"]);
/// ```
pub fn extract_keywords(message: &str) -> Vec<String> {
    let cleaned: String = message
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();

    let mut keywords: Vec<String> = Vec::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 2 || STOP_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }
    keywords
}

fn contains_word(haystack: &str, word: &str) -> bool {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
        .is_ok_and(|re| re.is_match(haystack))
}
