use std::fmt;
use std::sync::OnceLock;

use prlens_core::{PrlensError, TitleConfig};
use regex::Regex;
use serde::Serialize;

/// Score at or above which a title counts as vague.
pub const DEFAULT_VAGUENESS_THRESHOLD: u32 = 70;

const MAX_SCORE: u32 = 100;
const SHORT_TITLE_CHARS: usize = 15;
const SHORT_TITLE_POINTS: u32 = 30;
const NO_TICKET_POINTS: u32 = 15;
const MULTIPLE_VERBS_POINTS: u32 = 10;

const MAX_SUGGESTION_CHARS: usize = 80;
const MAX_CONTEXT_FILES: usize = 5;
const MAX_CONTEXT_TOKENS: usize = 3;
const MAX_HINTS: usize = 2;
/// Added lines above which an undeclared change is summarized generically.
const MULTI_COMPONENT_LINES: usize = 5;

const GENERIC_VERBS: &str = "fix|fixes|fixed|update|updates|updated|change|changed|\
    refactor|refactored|cleanup|tweak|tweaks|tweaked|improve|improved|modify|modified|edit|edited|adjust|adjusted";
const GENERIC_NOUNS: &str = "stuff|things|bug|bugs|bugfix|bugfixes|code|work|misc|minor|\
    improvements|typo|typos|issue|issues|changes|it|this|that";

/// Directory names that carry no information about a change.
const SCAFFOLDING_DIRS: &[&str] = &[
    "src", "lib", "app", "apps", "pkg", "packages", "internal", "cmd", "main", "index", "test",
    "tests", "spec", "dist", "build", "crates", "include", "public", "static", "assets", "vendor",
    "node_modules", "source", "sources",
];

/// Ordered verb groups; the first group with a whole-word match in the title wins.
const VERB_GROUPS: &[(&str, &str)] = &[
    (
        "Fix",
        r"fix(es|ed|ing)?|bugs?|bugfix(es)?|hotfix(es)?|patch(es|ed|ing)?|resolve[sd]?|resolving|repair(s|ed|ing)?",
    ),
    (
        "Add",
        r"add(s|ed|ing)?|create[sd]?|creating|implement(s|ed|ing)?|introduce[sd]?|introducing|new",
    ),
    (
        "Update",
        r"update[sd]?|updating|change[sd]?|changing|modif(y|ies|ied|ying)|upgrade[sd]?|upgrading|bump(s|ed|ing)?|improve[sd]?|improving|refactor(s|ed|ing)?",
    ),
    (
        "Remove",
        r"remove[sd]?|removing|delete[sd]?|deleting|drop(s|ped|ping)?|deprecate[sd]?|deprecating",
    ),
    ("Test", r"tests?|tested|testing|specs?|coverage"),
    (
        "Document",
        r"docs?|document(s|ed|ing|ation)?|readme|comments?|commented",
    ),
];

struct TitlePattern {
    regex: Regex,
    points: u32,
    description: &'static str,
}

fn title_patterns() -> &'static [TitlePattern] {
    static PATTERNS: OnceLock<Vec<TitlePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table = [
            (r"^\s*$".to_string(), 100, "title is empty"),
            (
                format!(r"(?i)^\s*({GENERIC_VERBS})\s*[.!]?\s*$"),
                60,
                "title is a single generic verb",
            ),
            (
                format!(r"(?i)^\s*({GENERIC_NOUNS})\s*[.!]?\s*$"),
                60,
                "title is a single generic noun",
            ),
            (
                format!(
                    r"(?i)^\s*({GENERIC_VERBS})\s+((the|some|a|an|small|minor)\s+)?({GENERIC_NOUNS})\s*[.!]?\s*$"
                ),
                50,
                "title pairs a generic verb with a generic noun",
            ),
            (
                r"(?i)(\b(wip|tmp|temp|todo|draft|dnm)\b|do not merge|\[wip\])".to_string(),
                40,
                "title marks work in progress",
            ),
        ];
        table
            .into_iter()
            .map(|(pattern, points, description)| TitlePattern {
                regex: Regex::new(&pattern).expect("valid regex"),
                points,
                description,
            })
            .collect()
    })
}

fn ticket_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z][A-Z0-9]+-\d+\b|#\d+\b").expect("valid regex"))
}

fn generic_verb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"(?i)\b({GENERIC_VERBS})\b")).expect("valid regex"))
}

fn declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:export\s+)?(?:default\s+)?(?:async\s+)?(?:fn|function|class|struct|enum|trait|interface|def|type|mod)\s+([A-Za-z_][A-Za-z0-9_]*)",
        )
        .expect("valid regex")
    })
}

/// Vagueness verdict for a change-request title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleAnalysis {
    pub is_vague: bool,
    /// 0 (descriptive) to 100 (meaningless).
    pub score: u32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_title: Option<String>,
}

impl TitleAnalysis {
    pub fn to_markdown(&self) -> String {
        let mut md = String::from("## Title\n\n");
        if !self.is_vague {
            md.push_str(&format!("Title looks descriptive (score {}).\n", self.score));
            return md;
        }
        md.push_str(&format!(
            "Title is vague (score {}): {}.\n",
            self.score, self.reason
        ));
        if let Some(suggestion) = &self.suggested_title {
            md.push_str(&format!("\nSuggested title: **{suggestion}**\n"));
        }
        md
    }
}

impl fmt::Display for TitleAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.is_vague { "vague" } else { "ok" };
        write!(f, "title {verdict} (score {}): {}", self.score, self.reason)?;
        if let Some(suggestion) = &self.suggested_title {
            write!(f, "\n  suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Scores change-request titles and proposes better ones from the diff.
///
/// # Examples
///
/// ```
/// use prlens_signals::title::TitleAnalyzer;
///
/// let analyzer = TitleAnalyzer::default();
/// let files = vec!["src/billing/invoice.rs".to_string()];
/// let analysis = analyzer.analyze("fix bug", "+pub fn render_invoice() {}\n", &files);
/// assert!(analysis.is_vague);
/// assert_eq!(
///     analysis.suggested_title.as_deref(),
///     Some("Fix billing invoice: render_invoice")
/// );
///
/// let good = analyzer.analyze("Add PDF rendering for invoices (BILL-42)", "", &files);
/// assert!(!good.is_vague);
/// ```
#[derive(Debug, Clone)]
pub struct TitleAnalyzer {
    threshold: u32,
}

impl Default for TitleAnalyzer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VAGUENESS_THRESHOLD,
        }
    }
}

impl TitleAnalyzer {
    /// Analyzer flagging titles scoring at least `threshold` (0 to 100).
    pub fn new(threshold: u32) -> prlens_core::Result<Self> {
        if threshold > MAX_SCORE {
            return Err(PrlensError::Config(format!(
                "vagueness threshold must be at most {MAX_SCORE}, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn from_config(config: &TitleConfig) -> prlens_core::Result<Self> {
        Self::new(config.vagueness_threshold)
    }

    /// Score `title`, suggesting a replacement from `diff` and `files` when vague.
    pub fn analyze(&self, title: &str, diff: &str, files: &[String]) -> TitleAnalysis {
        let (score, reasons) = score_title(title);
        let is_vague = score >= self.threshold;
        tracing::debug!(title, score, is_vague, "scored title");

        let reason = if reasons.is_empty() {
            "title is descriptive".to_string()
        } else {
            reasons.join("; ")
        };
        let suggested_title = if is_vague {
            suggest_title(title, diff, files)
        } else {
            None
        };

        TitleAnalysis {
            is_vague,
            score,
            reason,
            suggested_title,
        }
    }
}

fn score_title(title: &str) -> (u32, Vec<&'static str>) {
    let mut score = 0;
    let mut reasons = Vec::new();

    for pattern in title_patterns() {
        if pattern.regex.is_match(title) {
            score += pattern.points;
            reasons.push(pattern.description);
        }
    }
    if title.trim().chars().count() < SHORT_TITLE_CHARS {
        score += SHORT_TITLE_POINTS;
        reasons.push("title is shorter than 15 characters");
    }
    if !ticket_token().is_match(title) {
        score += NO_TICKET_POINTS;
        reasons.push("no ticket reference");
    }
    if generic_verb().find_iter(title).count() > 1 {
        score += MULTIPLE_VERBS_POINTS;
        reasons.push("several generic verbs");
    }

    (score.min(MAX_SCORE), reasons)
}

fn suggest_title(title: &str, diff: &str, files: &[String]) -> Option<String> {
    let context = context_tokens(files);
    let hints = change_hints(diff);

    if context.is_empty() && hints.is_empty() {
        return fallback_title(title, files);
    }

    let verb = infer_verb(title).unwrap_or(if hints.is_empty() { "Modify" } else { "Update" });
    let mut suggestion = verb.to_string();
    if !context.is_empty() {
        suggestion.push(' ');
        suggestion.push_str(&context.join(" "));
    }
    if !hints.is_empty() {
        suggestion.push_str(": ");
        suggestion.push_str(&hints.join(", "));
    }
    Some(truncate_chars(&capitalize(&suggestion), MAX_SUGGESTION_CHARS))
}

/// Salient directory and file-name tokens from the first few paths.
fn context_tokens(files: &[String]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for path in files.iter().take(MAX_CONTEXT_FILES) {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some(name) = segments.pop() else {
            continue;
        };
        let stem = name.split('.').next().unwrap_or(name);
        let dirs = segments
            .into_iter()
            .filter(|d| !SCAFFOLDING_DIRS.contains(&d.to_lowercase().as_str()));

        for part in dirs.chain(std::iter::once(stem)) {
            for token in part.split(['-', '_', ' ']) {
                let token = token.to_lowercase();
                if token.chars().count() <= 3 || SCAFFOLDING_DIRS.contains(&token.as_str()) {
                    continue;
                }
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
                if tokens.len() == MAX_CONTEXT_TOKENS {
                    return tokens;
                }
            }
        }
    }
    tokens
}

/// Names of newly declared top-level items, or a generic note for large additions.
fn change_hints(diff: &str) -> Vec<String> {
    let added: Vec<&str> = diff
        .lines()
        .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
        .map(|l| &l[1..])
        .collect();

    let mut hints: Vec<String> = Vec::new();
    for line in &added {
        if let Some(name) = declaration().captures(line).and_then(|c| c.get(1)) {
            let name = name.as_str().to_string();
            if !hints.contains(&name) {
                hints.push(name);
            }
            if hints.len() == MAX_HINTS {
                break;
            }
        }
    }
    if hints.is_empty() && added.len() > MULTI_COMPONENT_LINES {
        hints.push("multiple components".to_string());
    }
    hints
}

fn verb_groups() -> &'static [(&'static str, Regex)] {
    static GROUPS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        VERB_GROUPS
            .iter()
            .map(|(verb, words)| {
                let regex = Regex::new(&format!(r"(?i)\b({words})\b")).expect("valid regex");
                (*verb, regex)
            })
            .collect()
    })
}

fn infer_verb(title: &str) -> Option<&'static str> {
    verb_groups()
        .iter()
        .find(|(_, regex)| regex.is_match(title))
        .map(|(verb, _)| *verb)
}

fn fallback_title(title: &str, files: &[String]) -> Option<String> {
    if let [only] = files {
        let name = only.rsplit('/').next().unwrap_or(only);
        return Some(format!("Update {name}"));
    }
    if files.len() > 1 {
        let parent = |p: &str| p.rsplit_once('/').map(|(dir, _)| dir.to_string());
        let shared = parent(files[0].as_str())
            .filter(|dir| files.iter().all(|f| parent(f.as_str()).as_ref() == Some(dir)));
        if let Some(dir) = shared {
            return Some(format!("Update {} files in {dir}", files.len()));
        }
    }
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(truncate_chars(
            &format!("Update: {title}"),
            MAX_SUGGESTION_CHARS,
        ))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max - 3).collect();
    out.push_str("...");
    out
}
