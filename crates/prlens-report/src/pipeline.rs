use std::fmt;

use prlens_core::{CommitRecord, PrlensConfig};
use serde::{Deserialize, Serialize};

use prlens_difflens::classify::PathClassifier;
use prlens_difflens::parser::{changed_files, parse_unified_diff};
use prlens_difflens::risk::{ChangeSetSummary, FileRiskAssessment, RiskClassifier};
use prlens_difflens::sanitize::{reconstruct, DiffSanitizer, ExcludedFile};
use prlens_difflens::truncate::TokenBudgetTruncator;
use prlens_signals::ghost::{GhostCommitDetector, GhostReport};
use prlens_signals::tickets::{format_markdown, TicketDetector, TicketRef};
use prlens_signals::title::{TitleAnalysis, TitleAnalyzer};

/// Everything known about a change request.
///
/// Deserializes from JSON so callers can hand over a single document:
///
/// ```
/// use prlens_report::pipeline::ReportInput;
///
/// let input: ReportInput = serde_json::from_str(r#"{
///     "diff": "",
///     "title": "Add login throttling",
///     "commits": [{ "sha": "abc", "message": "throttle logins" }]
/// }"#).unwrap();
/// assert_eq!(input.commits.len(), 1);
/// assert!(input.body.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportInput {
    /// Raw unified diff of the whole change set.
    pub diff: String,
    /// Change-request title; title analysis is skipped without one.
    pub title: Option<String>,
    /// Change-request description.
    pub body: String,
    /// Commits in chronological order, each with its own diff when available.
    pub commits: Vec<CommitRecord>,
}

/// Token accounting for the bounded diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncationStats {
    /// Paths that fit the budget, in priority order.
    pub kept: Vec<String>,
    /// Paths dropped to fit the budget.
    pub dropped: Vec<String>,
    pub total_tokens: usize,
    pub max_tokens: usize,
}

/// Combined output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Every path touched by the raw diff.
    pub changed_files: Vec<String>,
    /// Files removed by the sanitizer.
    pub excluded: Vec<ExcludedFile>,
    /// Per-file risk of the sanitized files.
    pub assessments: Vec<FileRiskAssessment>,
    pub risk: ChangeSetSummary,
    pub truncation: TruncationStats,
    /// Reconstructed diff of the files that fit the budget.
    pub bounded_diff: String,
    pub ghost: GhostReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleAnalysis>,
    pub tickets: Vec<TicketRef>,
}

/// Runs every analysis over a [`ReportInput`].
///
/// All configuration is validated and compiled up front, so `run` itself
/// cannot fail.
///
/// # Examples
///
/// ```
/// use prlens_core::{PrlensConfig, RiskTier};
/// use prlens_report::pipeline::{AnalysisPipeline, ReportInput};
///
/// let pipeline = AnalysisPipeline::from_config(&PrlensConfig::default()).unwrap();
/// let report = pipeline.run(&ReportInput {
///     diff: "--- a/src/auth.rs\n+++ b/src/auth.rs\n@@ -1 +1 @@\n-a\n+b\n".into(),
///     title: Some("Tighten auth checks (SEC-7)".into()),
///     ..Default::default()
/// });
/// assert_eq!(report.risk.tier, RiskTier::High);
/// assert_eq!(report.tickets[0].id, "SEC-7");
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    sanitizer: DiffSanitizer,
    risk: RiskClassifier,
    truncator: TokenBudgetTruncator,
    ghost: GhostCommitDetector,
    title: TitleAnalyzer,
    tickets: TicketDetector,
    max_commits: usize,
}

impl AnalysisPipeline {
    /// Build every component from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PrlensError::Config`](prlens_core::PrlensError::Config) for out-of-range settings and
    /// [`PrlensError::InvalidPattern`](prlens_core::PrlensError::InvalidPattern) for bad globs or regexes.
    pub fn from_config(config: &PrlensConfig) -> prlens_core::Result<Self> {
        config.validate()?;
        let classifier = PathClassifier::from_config(&config.risk)?;

        Ok(Self {
            sanitizer: DiffSanitizer::with_classifier(config.sanitize, classifier.clone()),
            risk: RiskClassifier::new(classifier, config.risk.labels.clone()),
            truncator: TokenBudgetTruncator::from_config(&config.budget),
            ghost: GhostCommitDetector::from_config(&config.ghost)?,
            title: TitleAnalyzer::from_config(&config.title)?,
            tickets: TicketDetector::new(&config.tickets)?,
            max_commits: config.ghost.max_commits,
        })
    }

    /// Analyze one change request.
    pub fn run(&self, input: &ReportInput) -> AnalysisReport {
        let files = parse_unified_diff(&input.diff);
        let changed = changed_files(&files);

        let sanitized = self.sanitizer.sanitize(files);
        let kept_paths = changed_files(&sanitized.kept);
        let assessments = self.risk.assess(&sanitized.kept);
        let risk = self.risk.summarize(&assessments);

        let truncated = self.truncator.truncate(sanitized.kept, &self.risk);
        let bounded_diff = reconstruct(&truncated.files);
        let truncation = TruncationStats {
            kept: truncated.files.iter().map(|f| f.path().to_string()).collect(),
            dropped: truncated.dropped,
            total_tokens: truncated.total_tokens,
            max_tokens: truncated.max_tokens,
        };

        let commits = recent_commits(&input.commits, self.max_commits);
        let ghost = self.ghost.detect_all(commits);

        let title = input
            .title
            .as_deref()
            .map(|t| self.title.analyze(t, &input.diff, &kept_paths));

        let messages: Vec<String> = commits.iter().map(|c| c.message.clone()).collect();
        let tickets = self.tickets.detect_from_sources(
            input.title.as_deref().unwrap_or_default(),
            &input.body,
            &messages,
        );

        tracing::debug!(
            files = changed.len(),
            excluded = sanitized.excluded.len(),
            dropped = truncation.dropped.len(),
            commits = commits.len(),
            tickets = tickets.len(),
            "analysis complete"
        );

        AnalysisReport {
            changed_files: changed,
            excluded: sanitized.excluded,
            assessments,
            risk,
            truncation,
            bounded_diff,
            ghost,
            title,
            tickets,
        }
    }
}

/// The last `max` commits.
fn recent_commits(commits: &[CommitRecord], max: usize) -> &[CommitRecord] {
    &commits[commits.len().saturating_sub(max)..]
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.risk)?;

        if !self.excluded.is_empty() {
            writeln!(f, "Excluded ({}):", self.excluded.len())?;
            for skipped in &self.excluded {
                writeln!(f, "  {skipped}")?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "Token budget: {} files kept, {} dropped (~{}/{} tokens)",
            self.truncation.kept.len(),
            self.truncation.dropped.len(),
            self.truncation.total_tokens,
            self.truncation.max_tokens
        )?;
        for path in &self.truncation.dropped {
            writeln!(f, "  dropped {path}")?;
        }
        writeln!(f)?;

        write!(f, "{}", self.ghost)?;
        writeln!(f)?;

        if let Some(title) = &self.title {
            writeln!(f, "{title}")?;
            writeln!(f)?;
        }

        if self.tickets.is_empty() {
            writeln!(f, "No related tickets found.")?;
        } else {
            writeln!(f, "Tickets:")?;
            for ticket in &self.tickets {
                writeln!(f, "  {ticket}")?;
            }
        }
        Ok(())
    }
}

impl AnalysisReport {
    /// Render the full report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Change Analysis\n\n");
        out.push_str(&format!(
            "**Files:** {} changed, {} excluded, {} dropped for budget | **Label:** `{}`\n\n",
            self.changed_files.len(),
            self.excluded.len(),
            self.truncation.dropped.len(),
            self.risk.label
        ));
        out.push_str(&self.risk.to_markdown());
        out.push('\n');

        if !self.excluded.is_empty() {
            out.push_str("## Excluded Files\n\n");
            for skipped in &self.excluded {
                out.push_str(&format!(
                    "- `{}` ({}: {})\n",
                    skipped.path, skipped.category, skipped.reason
                ));
            }
            out.push('\n');
        }

        if !self.truncation.dropped.is_empty() {
            out.push_str(&format!(
                "## Token Budget\n\n~{}/{} tokens used. Dropped to fit:\n\n",
                self.truncation.total_tokens, self.truncation.max_tokens
            ));
            for path in &self.truncation.dropped {
                out.push_str(&format!("- `{path}`\n"));
            }
            out.push('\n');
        }

        out.push_str(&self.ghost.to_markdown());
        out.push('\n');

        if let Some(title) = &self.title {
            out.push_str(&title.to_markdown());
            out.push('\n');
        }

        out.push_str("## Related Tickets\n\n");
        out.push_str(&format_markdown(&self.tickets));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prlens_core::{PrlensError, RiskTier};

    const DIFF: &str = "\
diff --git a/Cargo.lock b/Cargo.lock
--- a/Cargo.lock
+++ b/Cargo.lock
@@ -1 +1 @@
-version = 1
+version = 2
diff --git a/src/auth/session.rs b/src/auth/session.rs
--- a/src/auth/session.rs
+++ b/src/auth/session.rs
@@ -1,1 +1,3 @@
 pub struct Session;
+pub fn refresh_session() {}
+pub fn expire_session() {}
diff --git a/docs/guide.md b/docs/guide.md
--- a/docs/guide.md
+++ b/docs/guide.md
@@ -1 +1 @@
-Old text
+New text
";

    fn commit(sha: &str, message: &str, diff: Option<&str>) -> CommitRecord {
        CommitRecord {
            sha: sha.into(),
            message: message.into(),
            diff: diff.map(str::to_string),
        }
    }

    fn pipeline() -> AnalysisPipeline {
        AnalysisPipeline::from_config(&PrlensConfig::default()).unwrap()
    }

    #[test]
    fn full_run() {
        let input = ReportInput {
            diff: DIFF.into(),
            title: Some("fix stuff".into()),
            body: "Closes AUTH-4".into(),
            commits: vec![
                commit(
                    "a1",
                    "Refresh sessions on expiry",
                    Some("+// refresh sessions before expiry\n+pub fn refresh_session() {}"),
                ),
                commit("b2", "Rewrite billing engine", Some("+// typo")),
            ],
        };
        let report = pipeline().run(&input);

        assert_eq!(
            report.changed_files,
            vec!["Cargo.lock", "src/auth/session.rs", "docs/guide.md"]
        );
        assert_eq!(report.excluded.len(), 1);
        assert_eq!(report.excluded[0].path, "Cargo.lock");

        assert_eq!(report.risk.tier, RiskTier::High);
        assert_eq!(report.risk.label, "risk:high");
        assert_eq!(report.truncation.kept, vec!["src/auth/session.rs", "docs/guide.md"]);
        assert!(report.bounded_diff.contains("+pub fn refresh_session() {}"));
        assert!(!report.bounded_diff.contains("Cargo.lock"));

        assert!(report.ghost.any_detected);
        assert_eq!(report.ghost.detected().next().unwrap().sha, "b2");

        let title = report.title.as_ref().unwrap();
        assert!(title.is_vague);
        assert_eq!(
            title.suggested_title.as_deref(),
            Some("Fix auth session docs: refresh_session, expire_session")
        );

        assert_eq!(report.tickets.len(), 1);
        assert_eq!(report.tickets[0].id, "AUTH-4");
    }

    #[test]
    fn empty_input_gives_default_report() {
        let report = pipeline().run(&ReportInput::default());
        assert!(report.changed_files.is_empty());
        assert_eq!(report.risk.tier, RiskTier::Low);
        assert_eq!(report.risk.score, 0);
        assert!(report.bounded_diff.is_empty());
        assert!(!report.ghost.any_detected);
        assert!(report.title.is_none());
        assert!(report.tickets.is_empty());
    }

    #[test]
    fn only_recent_commits_are_checked() {
        let commits: Vec<CommitRecord> = (0..25)
            .map(|i| commit(&format!("c{i}"), &format!("TASK-{i} tweak"), None))
            .collect();
        let report = pipeline().run(&ReportInput {
            commits,
            ..Default::default()
        });
        assert_eq!(report.ghost.findings.len(), 20);
        assert_eq!(report.ghost.findings[0].sha, "c5");
        assert_eq!(report.tickets.len(), 20);
        assert_eq!(report.tickets[0].id, "TASK-5");
    }

    #[test]
    fn budget_drops_files() {
        let mut config = PrlensConfig::default();
        // session.rs costs 31 tokens, guide.md 16
        config.budget.max_tokens = 40;
        let report = AnalysisPipeline::from_config(&config)
            .unwrap()
            .run(&ReportInput {
                diff: DIFF.into(),
                ..Default::default()
            });
        assert_eq!(report.truncation.kept, vec!["src/auth/session.rs"]);
        assert_eq!(report.truncation.dropped, vec!["docs/guide.md"]);
        assert_eq!(report.truncation.total_tokens, 31);
        assert!(!report.bounded_diff.contains("guide.md"));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = PrlensConfig::default();
        config.tickets.custom_pattern = Some("(".into());
        assert!(matches!(
            AnalysisPipeline::from_config(&config),
            Err(PrlensError::InvalidPattern { .. })
        ));

        let mut config = PrlensConfig::default();
        config.risk.high_patterns = vec!["[".into()];
        assert!(AnalysisPipeline::from_config(&config).is_err());

        let mut config = PrlensConfig::default();
        config.ghost.sensitivity = 2.0;
        assert!(matches!(
            AnalysisPipeline::from_config(&config),
            Err(PrlensError::Config(_))
        ));
    }

    #[test]
    fn renders_all_sections() {
        let report = pipeline().run(&ReportInput {
            diff: DIFF.into(),
            title: Some("Refresh auth sessions on expiry".into()),
            ..Default::default()
        });

        let md = report.to_markdown();
        for heading in [
            "# Change Analysis",
            "## Risk Summary",
            "## Excluded Files",
            "## Ghost Commits",
            "## Title",
            "## Related Tickets",
        ] {
            assert!(md.contains(heading), "missing {heading}");
        }
        assert!(md.contains("No related tickets found."));

        let text = report.to_string();
        assert!(text.contains("Excluded (1):"));
        assert!(text.contains("Token budget: 2 files kept"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["risk"]["tier"], "high");
        assert!(json["boundedDiff"].as_str().unwrap().starts_with("diff --git"));
        assert_eq!(json["truncation"]["maxTokens"], 12000);
    }
}
