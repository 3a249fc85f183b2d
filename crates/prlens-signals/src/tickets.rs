use std::fmt;

use prlens_core::{PrlensError, TicketConfig};
use regex::Regex;
use serde::Serialize;

const JIRA_PATTERN: &str = r"\b([A-Z][A-Z0-9]+-\d+)\b";
// `&#123;` entities and path fragments are not issue references.
const GITHUB_PATTERN: &str = r"(?:^|[^\w&/])#(\d+)\b";

/// Rendered when no ticket references are found.
pub const NO_TICKETS: &str = "No related tickets found.";

/// Kind of work-tracker reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketType {
    Jira,
    GithubIssue,
    Custom,
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketType::Jira => write!(f, "JIRA"),
            TicketType::GithubIssue => write!(f, "GitHub Issue"),
            TicketType::Custom => write!(f, "Custom"),
        }
    }
}

/// A ticket referenced from change-request text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRef {
    #[serde(rename = "type")]
    pub ticket_type: TicketType,
    pub id: String,
    pub url: String,
}

impl fmt::Display for TicketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.id, self.ticket_type, self.url)
    }
}

/// Extracts ticket references using either the default JIRA and GitHub
/// patterns or a single custom pattern that replaces them.
///
/// # Examples
///
/// ```
/// use prlens_core::TicketConfig;
/// use prlens_signals::tickets::{TicketDetector, TicketType};
///
/// let config = TicketConfig {
///     jira_url_template: Some("https://acme.atlassian.net/browse/{id}".into()),
///     ..Default::default()
/// };
/// let detector = TicketDetector::new(&config).unwrap();
/// let refs = detector.detect("Fixes PROJ-123 and also PROJ-123, see #7");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].id, "PROJ-123");
/// assert_eq!(refs[0].url, "https://acme.atlassian.net/browse/PROJ-123");
/// assert_eq!(refs[1].ticket_type, TicketType::GithubIssue);
/// assert_eq!(refs[1].id, "#7");
/// ```
#[derive(Debug, Clone)]
pub struct TicketDetector {
    patterns: Vec<(TicketType, Regex)>,
    config: TicketConfig,
}

impl TicketDetector {
    /// Build a detector, compiling the custom pattern when one is configured.
    pub fn new(config: &TicketConfig) -> prlens_core::Result<Self> {
        let patterns = match &config.custom_pattern {
            Some(custom) => vec![(TicketType::Custom, compile(custom)?)],
            None => vec![
                (TicketType::Jira, compile(JIRA_PATTERN)?),
                (TicketType::GithubIssue, compile(GITHUB_PATTERN)?),
            ],
        };
        Ok(Self {
            patterns,
            config: config.clone(),
        })
    }

    /// References in `text`, ordered by position, each id once.
    pub fn detect(&self, text: &str) -> Vec<TicketRef> {
        let mut hits: Vec<(usize, TicketType, String)> = Vec::new();
        for (ticket_type, regex) in &self.patterns {
            for caps in regex.captures_iter(text) {
                let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                if m.as_str().is_empty() {
                    continue;
                }
                let id = match ticket_type {
                    TicketType::GithubIssue => format!("#{}", m.as_str()),
                    _ => m.as_str().to_string(),
                };
                hits.push((m.start(), *ticket_type, id));
            }
        }
        hits.sort_by_key(|(pos, _, _)| *pos);

        let mut refs: Vec<TicketRef> = Vec::new();
        for (_, ticket_type, id) in hits {
            if refs.iter().any(|r| r.id == id) {
                continue;
            }
            let url = self.url_for(ticket_type, &id);
            refs.push(TicketRef {
                ticket_type,
                id,
                url,
            });
        }
        refs
    }

    /// References across title, body and commit messages, first occurrence wins.
    pub fn detect_from_sources(
        &self,
        title: &str,
        body: &str,
        commit_messages: &[String],
    ) -> Vec<TicketRef> {
        let sources = [title, body]
            .into_iter()
            .chain(commit_messages.iter().map(String::as_str));

        let mut refs: Vec<TicketRef> = Vec::new();
        for source in sources {
            for found in self.detect(source) {
                if !refs.iter().any(|r| r.id == found.id) {
                    refs.push(found);
                }
            }
        }
        tracing::debug!(count = refs.len(), "detected ticket references");
        refs
    }

    fn url_for(&self, ticket_type: TicketType, id: &str) -> String {
        match ticket_type {
            TicketType::Jira => fill_template(self.config.jira_url_template.as_deref(), id),
            TicketType::Custom => fill_template(self.config.url_template.as_deref(), id),
            TicketType::GithubIssue => {
                let number = id.trim_start_matches('#');
                match &self.config.github_base_url {
                    Some(base) => format!("{}/issues/{number}", base.trim_end_matches('/')),
                    None => format!("#{number}"),
                }
            }
        }
    }
}

/// Render references as a markdown list, or [`NO_TICKETS`] when empty.
///
/// # Examples
///
/// ```
/// use prlens_signals::tickets::format_markdown;
///
/// assert_eq!(format_markdown(&[]), "No related tickets found.");
/// ```
pub fn format_markdown(refs: &[TicketRef]) -> String {
    if refs.is_empty() {
        return NO_TICKETS.to_string();
    }
    refs.iter()
        .map(|r| format!("- [{}]({}) ({})", r.id, r.url, r.ticket_type))
        .collect::<Vec<_>>()
        .join("\n")
}

fn compile(pattern: &str) -> prlens_core::Result<Regex> {
    Regex::new(pattern).map_err(|e| PrlensError::invalid_pattern(pattern, e))
}

fn fill_template(template: Option<&str>, id: &str) -> String {
    template.map_or_else(|| "#".to_string(), |t| t.replace("{id}", id))
}
