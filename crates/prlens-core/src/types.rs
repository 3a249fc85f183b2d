use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of a file-level change in a diff.
///
/// # Examples
///
/// ```
/// use prlens_core::ChangeType;
///
/// let ct = ChangeType::Rename;
/// assert_eq!(format!("{ct}"), "rename");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Newly created file.
    Add,
    /// Removed file.
    Delete,
    /// Existing file modified in place.
    Modify,
    /// File moved to a new path, possibly with edits.
    Rename,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeType::Add => write!(f, "add"),
            ChangeType::Delete => write!(f, "delete"),
            ChangeType::Modify => write!(f, "modify"),
            ChangeType::Rename => write!(f, "rename"),
        }
    }
}

/// Ordinal risk classification of a changed file or a whole change set.
///
/// Ordering is `Low < Medium < High`, used both for comparison and as the
/// default truncation priority.
///
/// # Examples
///
/// ```
/// use prlens_core::RiskTier;
///
/// assert!(RiskTier::High > RiskTier::Medium);
/// assert_eq!(RiskTier::Medium.weight(), 5);
/// assert_eq!("high".parse::<RiskTier>().unwrap(), RiskTier::High);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Documentation, tests, examples and other low-impact files.
    #[default]
    Low,
    /// Ordinary code changes.
    Medium,
    /// Security, data and money-sensitive code.
    High,
}

impl RiskTier {
    /// All tiers, most important first.
    pub const ALL: [RiskTier; 3] = [RiskTier::High, RiskTier::Medium, RiskTier::Low];

    /// Per-file weight used by the impact score.
    pub fn weight(self) -> u32 {
        match self {
            RiskTier::High => 10,
            RiskTier::Medium => 5,
            RiskTier::Low => 1,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier: {other}")),
        }
    }
}

/// A commit on the change request, with its own diff when the host provided one.
///
/// # Examples
///
/// ```
/// use prlens_core::CommitRecord;
///
/// let commit: CommitRecord = serde_json::from_str(
///     r#"{"sha": "abc123", "message": "Fix token refresh"}"#,
/// ).unwrap();
/// assert!(commit.diff.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Commit hash.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Unified diff of this commit alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use prlens_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn risk_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
        assert_eq!(RiskTier::ALL.iter().max(), Some(&RiskTier::High));
    }

    #[test]
    fn risk_tier_weights() {
        assert_eq!(RiskTier::High.weight(), 10);
        assert_eq!(RiskTier::Medium.weight(), 5);
        assert_eq!(RiskTier::Low.weight(), 1);
    }

    #[test]
    fn risk_tier_roundtrips_through_json() {
        let json = serde_json::to_string(&RiskTier::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: RiskTier = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, RiskTier::Medium);
        assert!("HIGH".parse::<RiskTier>().is_ok());
        assert!("severe".parse::<RiskTier>().is_err());
    }

    #[test]
    fn change_type_display() {
        assert_eq!(ChangeType::Add.to_string(), "add");
        assert_eq!(ChangeType::Delete.to_string(), "delete");
        assert_eq!(ChangeType::Modify.to_string(), "modify");
        assert_eq!(ChangeType::Rename.to_string(), "rename");
    }

    #[test]
    fn commit_record_serializes_without_missing_diff() {
        let commit = CommitRecord {
            sha: "abc".into(),
            message: "msg".into(),
            diff: None,
        };
        let json = serde_json::to_value(&commit).unwrap();
        assert!(json.get("diff").is_none());
        assert_eq!(json["sha"], "abc");
    }
}
