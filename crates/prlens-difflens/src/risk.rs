use std::fmt;

use prlens_core::{RiskLabels, RiskTier};
use serde::Serialize;

use crate::classify::PathClassifier;
use crate::parser::FileChange;

/// Share of high-risk files at or above which the change set is high risk.
pub const HIGH_RATIO_FOR_HIGH: f64 = 0.20;
/// Share of high-risk files at or above which the change set is medium risk.
pub const HIGH_RATIO_FOR_MEDIUM: f64 = 0.10;
/// Share of medium-risk files at or above which the change set is medium risk.
pub const MEDIUM_RATIO_FOR_MEDIUM: f64 = 0.50;

const DEFAULT_REASON: &str = "standard code change";

/// Risk details for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRiskAssessment {
    /// File path.
    pub path: String,
    /// Assigned tier.
    pub tier: RiskTier,
    /// Why the tier was assigned.
    pub reasons: Vec<String>,
}

/// Number of files per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    /// Count the tiers of `assessments`.
    pub fn from_assessments(assessments: &[FileRiskAssessment]) -> Self {
        let mut counts = Self::default();
        for a in assessments {
            match a.tier {
                RiskTier::High => counts.high += 1,
                RiskTier::Medium => counts.medium += 1,
                RiskTier::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Aggregate risk for a whole change set.
///
/// # Examples
///
/// ```
/// use prlens_core::RiskTier;
/// use prlens_difflens::risk::RiskClassifier;
///
/// let classifier = RiskClassifier::default();
/// let summary = classifier.summarize_paths(&["src/auth/login.ts", "src/utils/helpers.ts"]);
/// assert_eq!(summary.tier, RiskTier::High);
/// assert_eq!(summary.score, 75);
/// assert_eq!(summary.high_risk_files, vec!["src/auth/login.ts"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSetSummary {
    /// Overall tier.
    pub tier: RiskTier,
    /// Impact score (0–100).
    pub score: u32,
    /// Files per tier.
    pub counts: TierCounts,
    /// Number of assessed files.
    pub total_files: usize,
    /// Paths of every high-risk file, in input order.
    pub high_risk_files: Vec<String>,
    /// Hosting platform label for `tier`.
    pub label: String,
}

/// Per-file and aggregate risk scoring on top of a [`PathClassifier`].
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    classifier: PathClassifier,
    labels: RiskLabels,
}

impl RiskClassifier {
    /// Classifier using `classifier` for keyword tiers and `labels` for platform labels.
    pub fn new(classifier: PathClassifier, labels: RiskLabels) -> Self {
        Self { classifier, labels }
    }

    /// Tier a single path. Paths matching no keyword are medium risk.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_core::RiskTier;
    /// use prlens_difflens::risk::RiskClassifier;
    ///
    /// let classifier = RiskClassifier::default();
    /// assert_eq!(classifier.assess_path("docs/README.md").tier, RiskTier::Low);
    /// let plain = classifier.assess_path("src/lib.rs");
    /// assert_eq!(plain.tier, RiskTier::Medium);
    /// assert_eq!(plain.reasons, vec!["standard code change"]);
    /// ```
    pub fn assess_path(&self, path: &str) -> FileRiskAssessment {
        match self.classifier.risk_tier(path) {
            Some(hit) => FileRiskAssessment {
                path: path.to_string(),
                tier: hit.category.tier().unwrap_or(RiskTier::Medium),
                reasons: vec![format!("{} (matches `{}`)", hit.reason, hit.pattern)],
            },
            None => FileRiskAssessment {
                path: path.to_string(),
                tier: RiskTier::Medium,
                reasons: vec![DEFAULT_REASON.to_string()],
            },
        }
    }

    /// Assess every file in order.
    pub fn assess(&self, files: &[FileChange]) -> Vec<FileRiskAssessment> {
        files.iter().map(|f| self.assess_path(f.path())).collect()
    }

    /// Summarize already computed assessments.
    pub fn summarize(&self, assessments: &[FileRiskAssessment]) -> ChangeSetSummary {
        let counts = TierCounts::from_assessments(assessments);
        let tier = overall_risk(counts);
        let tiers: Vec<RiskTier> = assessments.iter().map(|a| a.tier).collect();

        ChangeSetSummary {
            tier,
            score: impact_score(&tiers),
            counts,
            total_files: assessments.len(),
            high_risk_files: assessments
                .iter()
                .filter(|a| a.tier == RiskTier::High)
                .map(|a| a.path.clone())
                .collect(),
            label: self.labels.for_tier(tier).to_string(),
        }
    }

    /// Assess and summarize raw paths.
    pub fn summarize_paths(&self, paths: &[&str]) -> ChangeSetSummary {
        let assessments: Vec<_> = paths.iter().map(|p| self.assess_path(p)).collect();
        self.summarize(&assessments)
    }
}

/// Overall tier from per-tier counts.
///
/// # Examples
///
/// ```
/// use prlens_core::RiskTier;
/// use prlens_difflens::risk::{overall_risk, TierCounts};
///
/// assert_eq!(overall_risk(TierCounts::default()), RiskTier::Low);
/// let counts = TierCounts { high: 1, medium: 0, low: 3 };
/// assert_eq!(overall_risk(counts), RiskTier::High);
/// ```
pub fn overall_risk(counts: TierCounts) -> RiskTier {
    let n = counts.total();
    if n == 0 {
        return RiskTier::Low;
    }
    let high_ratio = counts.high as f64 / n as f64;
    let medium_ratio = counts.medium as f64 / n as f64;

    if high_ratio >= HIGH_RATIO_FOR_HIGH {
        RiskTier::High
    } else if high_ratio >= HIGH_RATIO_FOR_MEDIUM || counts.high > 0 {
        RiskTier::Medium
    } else if medium_ratio >= MEDIUM_RATIO_FOR_MEDIUM {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

/// Weighted impact score: `round(100 × Σweight / (10 × n))`, 0 for no files.
///
/// # Examples
///
/// ```
/// use prlens_core::RiskTier;
/// use prlens_difflens::risk::impact_score;
///
/// assert_eq!(impact_score(&[]), 0);
/// assert_eq!(impact_score(&[RiskTier::High, RiskTier::Medium]), 75);
/// ```
pub fn impact_score(tiers: &[RiskTier]) -> u32 {
    if tiers.is_empty() {
        return 0;
    }
    let total: u32 = tiers.iter().map(|t| t.weight()).sum();
    let max = RiskTier::High.weight() as f64 * tiers.len() as f64;
    (100.0 * total as f64 / max).round() as u32
}

impl fmt::Display for ChangeSetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk Summary")?;
        writeln!(f, "============")?;
        writeln!(f, "Overall Risk: {} ({}/100)", self.tier, self.score)?;
        writeln!(
            f,
            "Files: {} ({} high, {} medium, {} low)",
            self.total_files, self.counts.high, self.counts.medium, self.counts.low
        )?;
        if !self.high_risk_files.is_empty() {
            writeln!(f, "High-risk files:")?;
            for path in &self.high_risk_files {
                writeln!(f, "  {path}")?;
            }
        }
        Ok(())
    }
}

impl ChangeSetSummary {
    /// Render the summary as a markdown string.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_difflens::risk::RiskClassifier;
    ///
    /// let summary = RiskClassifier::default().summarize(&[]);
    /// let md = summary.to_markdown();
    /// assert!(md.contains("**Overall Risk:** low (0/100)"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("## Risk Summary\n\n");
        out.push_str(&format!(
            "**Overall Risk:** {} ({}/100)\n\n",
            self.tier, self.score
        ));
        out.push_str("| Tier | Files |\n");
        out.push_str("|------|-------|\n");
        out.push_str(&format!("| high | {} |\n", self.counts.high));
        out.push_str(&format!("| medium | {} |\n", self.counts.medium));
        out.push_str(&format!("| low | {} |\n", self.counts.low));
        if !self.high_risk_files.is_empty() {
            out.push_str("\n**High-risk files:**\n\n");
            for path in &self.high_risk_files {
                out.push_str(&format!("- `{path}`\n"));
            }
        }
        out
    }
}
