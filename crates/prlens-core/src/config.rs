use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PrlensError;
use crate::types::RiskTier;

/// Top-level configuration loaded from `.prlens.toml`.
///
/// Every section is optional; omitted values fall back to the documented
/// defaults. Pattern compilation happens in the components that use the
/// patterns, [`PrlensConfig::validate`] covers the numeric settings.
///
/// # Examples
///
/// ```
/// use prlens_core::PrlensConfig;
///
/// let config = PrlensConfig::default();
/// assert!(config.sanitize.exclude_lockfiles);
/// assert_eq!(config.title.vagueness_threshold, 70);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrlensConfig {
    /// Which file categories to drop before analysis.
    #[serde(default)]
    pub sanitize: SanitizeConfig,
    /// Custom risk patterns and platform labels.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Token budget for the bounded diff.
    #[serde(default)]
    pub budget: BudgetConfig,
    /// Commit message consistency settings.
    #[serde(default)]
    pub ghost: GhostConfig,
    /// Title vagueness settings.
    #[serde(default)]
    pub title: TitleConfig,
    /// Ticket reference detection settings.
    #[serde(default)]
    pub tickets: TicketConfig,
}

impl PrlensConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PrlensError::FileNotFound`] if `path` does not exist,
    /// [`PrlensError::Io`] if it cannot be read, or [`PrlensError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use prlens_core::PrlensConfig;
    /// use std::path::Path;
    ///
    /// let config = PrlensConfig::from_file(Path::new(".prlens.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, PrlensError> {
        if !path.exists() {
            return Err(PrlensError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PrlensError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_core::PrlensConfig;
    ///
    /// let toml = r#"
    /// [budget]
    /// max_tokens = 2000
    /// "#;
    /// let config = PrlensConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.budget.max_tokens, 2000);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, PrlensError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Check numeric ranges and the truncation priority list.
    ///
    /// # Errors
    ///
    /// Returns [`PrlensError::Config`] naming the first offending setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_core::PrlensConfig;
    ///
    /// let mut config = PrlensConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.ghost.sensitivity = 1.5;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PrlensError> {
        if !(0.0..=1.0).contains(&self.ghost.sensitivity) {
            return Err(PrlensError::Config(format!(
                "ghost.sensitivity must be within 0.0..=1.0, got {}",
                self.ghost.sensitivity
            )));
        }
        if self.title.vagueness_threshold > 100 {
            return Err(PrlensError::Config(format!(
                "title.vagueness_threshold must be at most 100, got {}",
                self.title.vagueness_threshold
            )));
        }
        for (i, tier) in self.budget.priority.iter().enumerate() {
            if self.budget.priority[..i].contains(tier) {
                return Err(PrlensError::Config(format!(
                    "budget.priority lists `{tier}` more than once"
                )));
            }
        }
        Ok(())
    }
}

/// File category exclusion toggles applied before analysis.
///
/// # Examples
///
/// ```
/// use prlens_core::SanitizeConfig;
///
/// let config = SanitizeConfig::default();
/// assert!(config.exclude_non_code_assets);
/// assert!(!config.exclude_tests);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeConfig {
    /// Drop package manager lock files (default: true).
    #[serde(default = "default_true")]
    pub exclude_lockfiles: bool,
    /// Drop images, fonts, archives, minified bundles and binaries (default: true).
    #[serde(default = "default_true")]
    pub exclude_non_code_assets: bool,
    /// Drop test sources and fixtures (default: false).
    #[serde(default)]
    pub exclude_tests: bool,
    /// Drop configuration files (default: false).
    #[serde(default)]
    pub exclude_configs: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            exclude_lockfiles: true,
            exclude_non_code_assets: true,
            exclude_tests: false,
            exclude_configs: false,
        }
    }
}

/// Custom risk glob patterns, checked before the built-in keywords of the same tier.
///
/// # Examples
///
/// ```
/// use prlens_core::{RiskConfig, RiskTier};
///
/// let config = RiskConfig::default();
/// assert!(config.high_patterns.is_empty());
/// assert_eq!(config.labels.for_tier(RiskTier::High), "risk:high");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Globs that mark a file as high risk.
    #[serde(default)]
    pub high_patterns: Vec<String>,
    /// Globs that mark a file as medium risk.
    #[serde(default)]
    pub medium_patterns: Vec<String>,
    /// Globs that mark a file as low risk.
    #[serde(default)]
    pub low_patterns: Vec<String>,
    /// Hosting platform labels applied per overall tier.
    #[serde(default)]
    pub labels: RiskLabels,
}

/// Label names for each risk tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLabels {
    #[serde(default = "default_low_label")]
    pub low: String,
    #[serde(default = "default_medium_label")]
    pub medium: String,
    #[serde(default = "default_high_label")]
    pub high: String,
}

fn default_low_label() -> String {
    "risk:low".into()
}

fn default_medium_label() -> String {
    "risk:medium".into()
}

fn default_high_label() -> String {
    "risk:high".into()
}

impl Default for RiskLabels {
    fn default() -> Self {
        Self {
            low: default_low_label(),
            medium: default_medium_label(),
            high: default_high_label(),
        }
    }
}

impl RiskLabels {
    /// Label for `tier`.
    pub fn for_tier(&self, tier: RiskTier) -> &str {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Medium => &self.medium,
            RiskTier::High => &self.high,
        }
    }
}

/// Token budget for the diff handed to the generation prompt.
///
/// # Examples
///
/// ```
/// use prlens_core::{BudgetConfig, RiskTier};
///
/// let config = BudgetConfig::default();
/// assert_eq!(config.max_tokens, 12000);
/// assert_eq!(config.priority[0], RiskTier::High);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Maximum estimated tokens for the bounded diff (default: 12000).
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Tier keep-order, most important first (default: high, medium, low).
    #[serde(default = "default_priority")]
    pub priority: Vec<RiskTier>,
}

fn default_max_tokens() -> usize {
    12000
}

fn default_priority() -> Vec<RiskTier> {
    RiskTier::ALL.to_vec()
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            priority: default_priority(),
        }
    }
}

/// Commit message consistency settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostConfig {
    /// Flag a commit when fewer than this share of its keywords appear in its diff (default: 0.3).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Only the most recent commits are checked (default: 20).
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,
}

fn default_sensitivity() -> f64 {
    0.3
}

fn default_max_commits() -> usize {
    20
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            max_commits: default_max_commits(),
        }
    }
}

/// Title vagueness settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    /// Score at or above which a title counts as vague (default: 70).
    #[serde(default = "default_vagueness_threshold")]
    pub vagueness_threshold: u32,
}

fn default_vagueness_threshold() -> u32 {
    70
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            vagueness_threshold: default_vagueness_threshold(),
        }
    }
}

/// Ticket reference detection settings.
///
/// URL templates use `{id}` as the placeholder.
///
/// # Examples
///
/// ```
/// use prlens_core::TicketConfig;
///
/// let toml = r#"
/// jira_url_template = "https://acme.atlassian.net/browse/{id}"
/// "#;
/// let config: TicketConfig = toml::from_str(toml).unwrap();
/// assert!(config.custom_pattern.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketConfig {
    /// Regex replacing the built-in JIRA and GitHub patterns entirely.
    #[serde(default)]
    pub custom_pattern: Option<String>,
    /// URL template for custom-pattern matches.
    #[serde(default)]
    pub url_template: Option<String>,
    /// URL template for JIRA keys.
    #[serde(default)]
    pub jira_url_template: Option<String>,
    /// Repository URL used to link `#123` references.
    #[serde(default)]
    pub github_base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = PrlensConfig::default();
        assert!(config.sanitize.exclude_lockfiles);
        assert!(config.sanitize.exclude_non_code_assets);
        assert!(!config.sanitize.exclude_tests);
        assert!(!config.sanitize.exclude_configs);
        assert_eq!(config.budget.max_tokens, 12000);
        assert_eq!(
            config.budget.priority,
            vec![RiskTier::High, RiskTier::Medium, RiskTier::Low]
        );
        assert_eq!(config.ghost.sensitivity, 0.3);
        assert_eq!(config.ghost.max_commits, 20);
        assert_eq!(config.title.vagueness_threshold, 70);
        assert!(config.tickets.custom_pattern.is_none());
        assert_eq!(config.risk.labels.for_tier(RiskTier::Low), "risk:low");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = PrlensConfig::from_toml("").unwrap();
        assert_eq!(config.budget.max_tokens, 12000);
        assert!(config.sanitize.exclude_lockfiles);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[sanitize]
exclude_lockfiles = false
exclude_tests = true

[risk]
high_patterns = ["infra/**"]
low_patterns = ["*.snap"]

[risk.labels]
high = "needs-security-review"

[budget]
max_tokens = 4000
priority = ["medium", "high", "low"]

[ghost]
sensitivity = 0.5
max_commits = 10

[title]
vagueness_threshold = 60

[tickets]
custom_pattern = "ENG_(\\d+)"
url_template = "https://tracker.example.com/{id}"
"#;
        let config = PrlensConfig::from_toml(toml).unwrap();
        assert!(!config.sanitize.exclude_lockfiles);
        assert!(config.sanitize.exclude_non_code_assets);
        assert!(config.sanitize.exclude_tests);
        assert_eq!(config.risk.high_patterns, vec!["infra/**"]);
        assert_eq!(config.risk.labels.high, "needs-security-review");
        assert_eq!(config.risk.labels.low, "risk:low");
        assert_eq!(config.budget.max_tokens, 4000);
        assert_eq!(config.budget.priority[0], RiskTier::Medium);
        assert_eq!(config.ghost.sensitivity, 0.5);
        assert_eq!(config.ghost.max_commits, 10);
        assert_eq!(config.title.vagueness_threshold, 60);
        assert_eq!(config.tickets.custom_pattern.as_deref(), Some("ENG_(\\d+)"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(PrlensConfig::from_toml("{{invalid}}").is_err());
    }

    #[test]
    fn unknown_tier_in_priority_is_rejected() {
        let toml = r#"
[budget]
priority = ["critical"]
"#;
        assert!(PrlensConfig::from_toml(toml).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut config = PrlensConfig::default();
        config.ghost.sensitivity = -0.1;
        assert!(matches!(config.validate(), Err(PrlensError::Config(_))));

        let mut config = PrlensConfig::default();
        config.title.vagueness_threshold = 101;
        assert!(config.validate().is_err());

        let mut config = PrlensConfig::default();
        config.budget.priority = vec![RiskTier::High, RiskTier::High];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = PrlensConfig::from_file(Path::new("/nonexistent/.prlens.toml")).unwrap_err();
        assert!(matches!(err, PrlensError::FileNotFound(_)));
    }
}
