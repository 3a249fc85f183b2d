//! Path classification against named pattern categories.
//!
//! All built-in knowledge lives in one ordered [`RULES`] table of
//! `(category, matcher, reason)` entries consumed by a single matcher, so
//! the sanitizer and the risk classifier agree on what a path is.

use std::fmt;

use prlens_core::{PrlensError, RiskConfig, RiskTier};
use serde::Serialize;

/// A named set of path patterns.
///
/// # Examples
///
/// ```
/// use prlens_difflens::classify::PathCategory;
/// use prlens_core::RiskTier;
///
/// assert_eq!(PathCategory::HighRisk.tier(), Some(RiskTier::High));
/// assert_eq!(PathCategory::Lockfile.tier(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathCategory {
    /// Package manager lock files.
    Lockfile,
    /// Images, fonts, media, archives, compiled and minified artifacts.
    NonCodeAsset,
    /// Test sources, specs and fixtures.
    Test,
    /// Build, CI and application configuration.
    Config,
    /// Security, credential, money and migration code.
    HighRisk,
    /// Service, API and data-layer code.
    MediumRisk,
    /// Docs, examples, styles and tests.
    LowRisk,
}

impl PathCategory {
    /// The risk tier a keyword category assigns, if it is one.
    pub fn tier(self) -> Option<RiskTier> {
        match self {
            PathCategory::HighRisk => Some(RiskTier::High),
            PathCategory::MediumRisk => Some(RiskTier::Medium),
            PathCategory::LowRisk => Some(RiskTier::Low),
            _ => None,
        }
    }

    fn for_tier(tier: RiskTier) -> Self {
        match tier {
            RiskTier::High => PathCategory::HighRisk,
            RiskTier::Medium => PathCategory::MediumRisk,
            RiskTier::Low => PathCategory::LowRisk,
        }
    }
}

impl fmt::Display for PathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCategory::Lockfile => write!(f, "lock file"),
            PathCategory::NonCodeAsset => write!(f, "non-code asset"),
            PathCategory::Test => write!(f, "test"),
            PathCategory::Config => write!(f, "config"),
            PathCategory::HighRisk => write!(f, "high risk"),
            PathCategory::MediumRisk => write!(f, "medium risk"),
            PathCategory::LowRisk => write!(f, "low risk"),
        }
    }
}

/// The first rule of a category that matched a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMatch {
    pub category: PathCategory,
    /// The pattern text that matched.
    pub pattern: String,
    /// Human-readable explanation.
    pub reason: String,
}

/// How a built-in rule inspects a path. Names and segments are compared lowercased.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    /// Exact final segment.
    Name(&'static str),
    /// Final segment ends with.
    Suffix(&'static str),
    /// Final segment starts with.
    Prefix(&'static str),
    /// Final segment contains.
    Keyword(&'static str),
    /// Any directory segment equals.
    Dir(&'static str),
}

impl Matcher {
    fn matches(self, name: &str, dirs: &[&str]) -> bool {
        match self {
            Matcher::Name(n) => name == n,
            Matcher::Suffix(s) => name.ends_with(s),
            Matcher::Prefix(p) => name.starts_with(p),
            Matcher::Keyword(k) => name.contains(k),
            Matcher::Dir(d) => dirs.contains(&d),
        }
    }

    fn text(self) -> &'static str {
        match self {
            Matcher::Name(s)
            | Matcher::Suffix(s)
            | Matcher::Prefix(s)
            | Matcher::Keyword(s)
            | Matcher::Dir(s) => s,
        }
    }
}

use Matcher::{Dir, Keyword, Name, Prefix, Suffix};
use PathCategory::{Config, HighRisk, Lockfile, LowRisk, MediumRisk, NonCodeAsset, Test};

/// Built-in rules. Order within a category is evaluation order.
const RULES: &[(PathCategory, Matcher, &str)] = &[
    (Lockfile, Name("package-lock.json"), "npm lock file"),
    (Lockfile, Name("npm-shrinkwrap.json"), "npm lock file"),
    (Lockfile, Name("yarn.lock"), "yarn lock file"),
    (Lockfile, Name("pnpm-lock.yaml"), "pnpm lock file"),
    (Lockfile, Name("bun.lockb"), "bun lock file"),
    (Lockfile, Name("cargo.lock"), "cargo lock file"),
    (Lockfile, Name("poetry.lock"), "poetry lock file"),
    (Lockfile, Name("pipfile.lock"), "pipenv lock file"),
    (Lockfile, Name("gemfile.lock"), "bundler lock file"),
    (Lockfile, Name("composer.lock"), "composer lock file"),
    (Lockfile, Name("go.sum"), "go checksum file"),
    (Lockfile, Name("flake.lock"), "nix lock file"),
    (Lockfile, Name("mix.lock"), "mix lock file"),
    (Lockfile, Name("pubspec.lock"), "pub lock file"),
    (Lockfile, Name("packages.lock.json"), "nuget lock file"),
    (NonCodeAsset, Suffix(".min.js"), "minified bundle"),
    (NonCodeAsset, Suffix(".min.css"), "minified bundle"),
    (NonCodeAsset, Suffix(".map"), "source map"),
    (NonCodeAsset, Suffix(".png"), "image"),
    (NonCodeAsset, Suffix(".jpg"), "image"),
    (NonCodeAsset, Suffix(".jpeg"), "image"),
    (NonCodeAsset, Suffix(".gif"), "image"),
    (NonCodeAsset, Suffix(".bmp"), "image"),
    (NonCodeAsset, Suffix(".ico"), "image"),
    (NonCodeAsset, Suffix(".webp"), "image"),
    (NonCodeAsset, Suffix(".svg"), "image"),
    (NonCodeAsset, Suffix(".pdf"), "document binary"),
    (NonCodeAsset, Suffix(".woff"), "font"),
    (NonCodeAsset, Suffix(".woff2"), "font"),
    (NonCodeAsset, Suffix(".ttf"), "font"),
    (NonCodeAsset, Suffix(".otf"), "font"),
    (NonCodeAsset, Suffix(".eot"), "font"),
    (NonCodeAsset, Suffix(".mp3"), "media"),
    (NonCodeAsset, Suffix(".mp4"), "media"),
    (NonCodeAsset, Suffix(".mov"), "media"),
    (NonCodeAsset, Suffix(".wav"), "media"),
    (NonCodeAsset, Suffix(".zip"), "archive"),
    (NonCodeAsset, Suffix(".tar"), "archive"),
    (NonCodeAsset, Suffix(".gz"), "archive"),
    (NonCodeAsset, Suffix(".tgz"), "archive"),
    (NonCodeAsset, Suffix(".7z"), "archive"),
    (NonCodeAsset, Suffix(".jar"), "compiled artifact"),
    (NonCodeAsset, Suffix(".wasm"), "compiled artifact"),
    (NonCodeAsset, Suffix(".exe"), "compiled artifact"),
    (NonCodeAsset, Suffix(".dll"), "compiled artifact"),
    (NonCodeAsset, Suffix(".so"), "compiled artifact"),
    (NonCodeAsset, Suffix(".dylib"), "compiled artifact"),
    (NonCodeAsset, Suffix(".pyc"), "compiled artifact"),
    (NonCodeAsset, Suffix(".class"), "compiled artifact"),
    (Test, Dir("__tests__"), "test directory"),
    (Test, Dir("tests"), "test directory"),
    (Test, Dir("test"), "test directory"),
    (Test, Dir("spec"), "spec directory"),
    (Test, Dir("e2e"), "end-to-end test directory"),
    (Test, Dir("fixtures"), "fixture directory"),
    (Test, Dir("__fixtures__"), "fixture directory"),
    (Test, Dir("__mocks__"), "mock directory"),
    (Test, Dir("testdata"), "test data directory"),
    (Test, Keyword(".test."), "test file"),
    (Test, Keyword(".spec."), "spec file"),
    (Test, Suffix("_test.go"), "go test file"),
    (Test, Suffix("_test.rs"), "rust test file"),
    (Test, Suffix("_test.py"), "python test file"),
    (Test, Suffix("_spec.rb"), "rspec file"),
    (Test, Prefix("test_"), "test file"),
    (Config, Name("package.json"), "package manifest"),
    (Config, Name("cargo.toml"), "package manifest"),
    (Config, Name("pyproject.toml"), "package manifest"),
    (Config, Name("tsconfig.json"), "compiler config"),
    (Config, Name("dockerfile"), "container config"),
    (Config, Name("docker-compose.yml"), "container config"),
    (Config, Name("docker-compose.yaml"), "container config"),
    (Config, Name("makefile"), "build config"),
    (Config, Name(".gitignore"), "repository config"),
    (Config, Name(".gitattributes"), "repository config"),
    (Config, Name(".editorconfig"), "editor config"),
    (Config, Prefix(".eslintrc"), "lint config"),
    (Config, Prefix(".prettierrc"), "format config"),
    (Config, Prefix(".babelrc"), "build config"),
    (Config, Prefix(".env"), "environment config"),
    (Config, Suffix(".config.js"), "tool config"),
    (Config, Suffix(".config.ts"), "tool config"),
    (Config, Suffix(".config.mjs"), "tool config"),
    (Config, Suffix(".toml"), "config file"),
    (Config, Suffix(".yaml"), "config file"),
    (Config, Suffix(".yml"), "config file"),
    (Config, Suffix(".ini"), "config file"),
    (Config, Suffix(".cfg"), "config file"),
    (Config, Suffix(".conf"), "config file"),
    (Config, Suffix(".properties"), "config file"),
    (Config, Dir(".github"), "CI config"),
    (Config, Dir(".circleci"), "CI config"),
    (HighRisk, Keyword("auth"), "authentication code"),
    (HighRisk, Keyword("login"), "authentication code"),
    (HighRisk, Keyword("session"), "session handling"),
    (HighRisk, Keyword("password"), "credential handling"),
    (HighRisk, Keyword("credential"), "credential handling"),
    (HighRisk, Keyword("secret"), "credential handling"),
    (HighRisk, Keyword("token"), "credential handling"),
    (HighRisk, Keyword("permission"), "access control"),
    (HighRisk, Keyword("role"), "access control"),
    (HighRisk, Keyword("admin"), "privileged access"),
    (HighRisk, Keyword("security"), "security-sensitive code"),
    (HighRisk, Keyword("crypt"), "cryptography"),
    (HighRisk, Keyword("payment"), "payment processing"),
    (HighRisk, Keyword("billing"), "payment processing"),
    (HighRisk, Keyword("invoice"), "payment processing"),
    (HighRisk, Keyword("migration"), "database migration"),
    (HighRisk, Suffix(".pem"), "key material"),
    (HighRisk, Suffix(".key"), "key material"),
    (MediumRisk, Keyword("api"), "API surface"),
    (MediumRisk, Keyword("route"), "routing"),
    (MediumRisk, Keyword("controller"), "request handling"),
    (MediumRisk, Keyword("handler"), "request handling"),
    (MediumRisk, Keyword("middleware"), "request handling"),
    (MediumRisk, Keyword("service"), "service layer"),
    (MediumRisk, Keyword("model"), "data model"),
    (MediumRisk, Keyword("schema"), "data model"),
    (MediumRisk, Keyword("database"), "data access"),
    (MediumRisk, Keyword("query"), "data access"),
    (MediumRisk, Keyword("repository"), "data access"),
    (MediumRisk, Keyword("store"), "state management"),
    (MediumRisk, Keyword("config"), "configuration"),
    (LowRisk, Keyword("readme"), "documentation"),
    (LowRisk, Keyword("changelog"), "documentation"),
    (LowRisk, Keyword("license"), "documentation"),
    (LowRisk, Suffix(".md"), "documentation"),
    (LowRisk, Suffix(".mdx"), "documentation"),
    (LowRisk, Suffix(".rst"), "documentation"),
    (LowRisk, Suffix(".txt"), "documentation"),
    (LowRisk, Keyword("test"), "test code"),
    (LowRisk, Keyword("spec"), "test code"),
    (LowRisk, Keyword("mock"), "test code"),
    (LowRisk, Keyword("fixture"), "test code"),
    (LowRisk, Keyword("example"), "example code"),
    (LowRisk, Keyword("stories"), "UI stories"),
    (LowRisk, Suffix(".snap"), "snapshot"),
    (LowRisk, Suffix(".css"), "styling"),
    (LowRisk, Suffix(".scss"), "styling"),
];

/// Classifies paths against the built-in rule table plus caller patterns.
///
/// Custom risk globs for a tier are checked before that tier's built-ins and
/// match either the whole path or the file name.
///
/// # Examples
///
/// ```
/// use prlens_difflens::classify::{PathCategory, PathClassifier};
/// use prlens_core::RiskTier;
///
/// let classifier = PathClassifier::new();
/// assert!(classifier.is(PathCategory::Lockfile, "web/package-lock.json"));
/// assert!(classifier.is(PathCategory::Test, "pkg/fixtures/data.rs"));
///
/// let hit = classifier.risk_tier("src/auth/login.ts").unwrap();
/// assert_eq!(hit.category.tier(), Some(RiskTier::High));
/// assert!(classifier.risk_tier("src/utils/helpers.ts").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    custom_high: Vec<glob::Pattern>,
    custom_medium: Vec<glob::Pattern>,
    custom_low: Vec<glob::Pattern>,
}

impl PathClassifier {
    /// Classifier with built-in rules only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with the custom risk globs from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PrlensError::InvalidPattern`] for the first glob that does not
    /// compile. An inert pattern would silently under-report risk.
    ///
    /// # Examples
    ///
    /// ```
    /// use prlens_core::RiskConfig;
    /// use prlens_difflens::classify::PathClassifier;
    ///
    /// let config = RiskConfig {
    ///     high_patterns: vec!["infra/**".into()],
    ///     ..RiskConfig::default()
    /// };
    /// let classifier = PathClassifier::from_config(&config).unwrap();
    /// assert!(classifier.risk_tier("infra/main.tf").is_some());
    ///
    /// let bad = RiskConfig {
    ///     low_patterns: vec!["[oops".into()],
    ///     ..RiskConfig::default()
    /// };
    /// assert!(PathClassifier::from_config(&bad).is_err());
    /// ```
    pub fn from_config(config: &RiskConfig) -> prlens_core::Result<Self> {
        Ok(Self {
            custom_high: compile_globs(&config.high_patterns)?,
            custom_medium: compile_globs(&config.medium_patterns)?,
            custom_low: compile_globs(&config.low_patterns)?,
        })
    }

    /// First matching rule of `category` for `path`, if any.
    pub fn classify(&self, category: PathCategory, path: &str) -> Option<PathMatch> {
        let lowered = path.to_lowercase();
        let mut segments: Vec<&str> = lowered.split('/').filter(|s| !s.is_empty()).collect();
        let name = segments.pop().unwrap_or_default();

        if let Some(tier) = category.tier() {
            let file_name = path.rsplit('/').next().unwrap_or(path);
            if let Some(pattern) = self
                .custom(tier)
                .iter()
                .find(|p| p.matches(path) || p.matches(file_name))
            {
                return Some(PathMatch {
                    category,
                    pattern: pattern.as_str().to_string(),
                    reason: format!("matches custom {category} pattern"),
                });
            }
        }

        RULES
            .iter()
            .filter(|(cat, _, _)| *cat == category)
            .find(|(_, matcher, _)| matcher.matches(name, &segments))
            .map(|(_, matcher, reason)| PathMatch {
                category,
                pattern: matcher.text().to_string(),
                reason: (*reason).to_string(),
            })
    }

    /// Whether `path` belongs to `category`.
    pub fn is(&self, category: PathCategory, path: &str) -> bool {
        self.classify(category, path).is_some()
    }

    /// The single risk tier for `path`, trying high, then medium, then low.
    pub fn risk_tier(&self, path: &str) -> Option<PathMatch> {
        RiskTier::ALL
            .iter()
            .find_map(|tier| self.classify(PathCategory::for_tier(*tier), path))
    }

    fn custom(&self, tier: RiskTier) -> &[glob::Pattern] {
        match tier {
            RiskTier::High => &self.custom_high,
            RiskTier::Medium => &self.custom_medium,
            RiskTier::Low => &self.custom_low,
        }
    }
}

fn compile_globs(patterns: &[String]) -> prlens_core::Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(|e| PrlensError::invalid_pattern(p, e)))
        .collect()
}
