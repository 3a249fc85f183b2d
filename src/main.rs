use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use prlens_core::{CommitRecord, OutputFormat, PrlensConfig};
use prlens_difflens::classify::PathClassifier;
use prlens_difflens::parser::{changed_files, parse_unified_diff};
use prlens_difflens::risk::{ChangeSetSummary, FileRiskAssessment, RiskClassifier};
use prlens_difflens::sanitize::{reconstruct, DiffSanitizer, ExcludedFile};
use prlens_difflens::truncate::TokenBudgetTruncator;
use prlens_report::pipeline::{AnalysisPipeline, ReportInput};
use prlens_signals::ghost::GhostCommitDetector;
use prlens_signals::tickets::{format_markdown, TicketDetector};
use prlens_signals::title::TitleAnalyzer;

const DEFAULT_CONFIG_PATH: &str = ".prlens.toml";

#[derive(Parser)]
#[command(
    name = "prlens",
    version,
    about = "Deterministic risk, budget and hygiene signals for pull requests",
    long_about = "prlens turns a diff and its commit metadata into explainable signals:\n\
                   per-file risk, a token-bounded diff for model prompts, ghost commits,\n\
                   vague titles and referenced tickets.\n\n\
                   Examples:\n  \
                     git diff main | prlens diff              Risk summary of a diff\n  \
                     git diff main | prlens truncate          Diff cut to the token budget\n  \
                     prlens title 'fix stuff' --file pr.diff  Score a PR title\n  \
                     prlens tickets --title 'PROJ-1 login'    Find ticket references\n  \
                     prlens report --input pr.json            Full analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .prlens.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Sanitize a diff and score its risk
    #[command(long_about = "Sanitize a diff and score its risk.\n\n\
        Drops lock files and non-code assets (plus tests and configs when enabled),\n\
        then assigns every remaining file a risk tier and scores the change set.\n\n\
        Examples:\n  git diff | prlens diff\n  prlens diff --file changes.patch --format json")]
    Diff {
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Cut a diff down to a token budget
    #[command(long_about = "Cut a diff down to a token budget.\n\n\
        Keeps high-risk files first and drops whole files until the estimate fits.\n\
        Prints the bounded diff to stdout and budget usage to stderr.\n\n\
        Examples:\n  git diff | prlens truncate --max-tokens 4000")]
    Truncate {
        /// Read diff from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Token budget (default: from config, 12000)
        #[arg(long)]
        max_tokens: Option<usize>,
    },
    /// Flag commits whose message does not match their diff
    #[command(long_about = "Flag commits whose message does not match their diff.\n\n\
        Reads a JSON array of {sha, message, diff} objects.\n\n\
        Examples:\n  prlens ghost --commits commits.json\n  prlens ghost --sensitivity 0.5 < commits.json")]
    Ghost {
        /// Read commits from file instead of stdin
        #[arg(long)]
        commits: Option<PathBuf>,
        /// Minimum share of message keywords found in the diff (0.0 to 1.0)
        #[arg(long)]
        sensitivity: Option<f64>,
    },
    /// Score a pull request title and suggest a better one
    Title {
        /// The title to analyze
        title: String,
        /// Diff used to build a suggestion
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Find work-tracker ticket references
    Tickets {
        /// Pull request title
        #[arg(long, default_value = "")]
        title: String,
        /// Pull request body
        #[arg(long, default_value = "")]
        body: String,
        /// Commit message (repeatable)
        #[arg(long = "commit")]
        commits: Vec<String>,
    },
    /// Run every analysis over a JSON change request
    #[command(long_about = "Run every analysis over a JSON change request.\n\n\
        Input is {diff, title, body, commits}; every field is optional.\n\n\
        Examples:\n  prlens report --input pr.json --format markdown")]
    Report {
        /// Read input from file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Create a default .prlens.toml configuration file
    #[command(long_about = "Create a default .prlens.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .prlens.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiffReport {
    summary: ChangeSetSummary,
    files: Vec<FileRiskAssessment>,
    excluded: Vec<ExcludedFile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TruncateReport {
    kept: Vec<String>,
    dropped: Vec<String>,
    total_tokens: usize,
    max_tokens: usize,
    diff: String,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_new("prlens=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: &Option<PathBuf>) -> Result<PrlensConfig> {
    let config = match path {
        Some(path) => PrlensConfig::from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                PrlensConfig::from_file(default_path)?
            } else {
                PrlensConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

fn read_input(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("prlens v{version}: explainable signals for pull requests\n");

    println!("Commands:");
    println!("  diff      Sanitize a diff and score its risk");
    println!("  truncate  Cut a diff down to a token budget");
    println!("  ghost     Flag commits whose message does not match their diff");
    println!("  title     Score a pull request title and suggest a better one");
    println!("  tickets   Find work-tracker ticket references");
    println!("  report    Run every analysis over a JSON change request");
    println!("  init      Create default configuration\n");

    println!("Run 'prlens <command> --help' for details.");
}

const DEFAULT_CONFIG: &str = r#"# prlens configuration

[sanitize]
# exclude_lockfiles = true
# exclude_non_code_assets = true
# exclude_tests = false
# exclude_configs = false

[risk]
# Extra globs per tier, checked before the built-in keyword rules
# high_patterns = ["infra/terraform/**"]
# medium_patterns = []
# low_patterns = ["src/generated/**"]

[risk.labels]
# low = "risk:low"
# medium = "risk:medium"
# high = "risk:high"

[budget]
# max_tokens = 12000
# Keep order, most important tier first
# priority = ["high", "medium", "low"]

[ghost]
# sensitivity = 0.3
# max_commits = 20

[title]
# vagueness_threshold = 70

[tickets]
# Replaces the built-in JIRA and GitHub patterns; group 1 is the id
# custom_pattern = "\\bREQ-(\\d+)\\b"
# url_template = "https://tracker.example.com/{id}"
# jira_url_template = "https://example.atlassian.net/browse/{id}"
# github_base_url = "https://github.com/owner/repo"
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = load_config(&cli.config)?;
    tracing::debug!(format = %cli.format, "configuration loaded");

    match cli.command {
        None => print_welcome(),
        Some(Command::Diff { ref file }) => {
            let input = read_input(file)?;
            let classifier = PathClassifier::from_config(&config.risk)?;
            let sanitizer = DiffSanitizer::with_classifier(config.sanitize, classifier.clone());
            let risk = RiskClassifier::new(classifier, config.risk.labels.clone());

            let sanitized = sanitizer.sanitize(parse_unified_diff(&input));
            let files = risk.assess(&sanitized.kept);
            let report = DiffReport {
                summary: risk.summarize(&files),
                files,
                excluded: sanitized.excluded,
            };

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Markdown => {
                    print!("{}", report.summary.to_markdown());
                    if !report.excluded.is_empty() {
                        println!("\n## Excluded Files\n");
                        for skipped in &report.excluded {
                            println!("- `{}` ({})", skipped.path, skipped.reason);
                        }
                    }
                }
                OutputFormat::Text => {
                    print!("{}", report.summary);
                    for skipped in &report.excluded {
                        println!("excluded: {skipped}");
                    }
                }
            }
        }
        Some(Command::Truncate {
            ref file,
            max_tokens,
        }) => {
            let input = read_input(file)?;
            let mut budget = config.budget.clone();
            if let Some(max) = max_tokens {
                budget.max_tokens = max;
            }
            let classifier = PathClassifier::from_config(&config.risk)?;
            let sanitizer = DiffSanitizer::with_classifier(config.sanitize, classifier.clone());
            let risk = RiskClassifier::new(classifier, config.risk.labels.clone());

            let sanitized = sanitizer.sanitize(parse_unified_diff(&input));
            let result = TokenBudgetTruncator::from_config(&budget).truncate(sanitized.kept, &risk);
            let diff = reconstruct(&result.files);

            match cli.format {
                OutputFormat::Json => print_json(&TruncateReport {
                    kept: changed_files(&result.files),
                    dropped: result.dropped,
                    total_tokens: result.total_tokens,
                    max_tokens: result.max_tokens,
                    diff,
                })?,
                OutputFormat::Markdown => {
                    println!("```diff\n{diff}```");
                    eprintln!("{result}");
                }
                OutputFormat::Text => {
                    print!("{diff}");
                    eprintln!("{result}");
                }
            }
        }
        Some(Command::Ghost {
            ref commits,
            sensitivity,
        }) => {
            let input = read_input(commits)?;
            let records: Vec<CommitRecord> = serde_json::from_str(&input)
                .into_diagnostic()
                .wrap_err("parsing commits JSON")?;
            let detector =
                GhostCommitDetector::new(sensitivity.unwrap_or(config.ghost.sensitivity))?;
            let report = detector.detect_all(&records);

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Markdown => print!("{}", report.to_markdown()),
                OutputFormat::Text => print!("{report}"),
            }
        }
        Some(Command::Title {
            ref title,
            ref file,
        }) => {
            let diff = match file {
                Some(_) => read_input(file)?,
                None => String::new(),
            };
            let classifier = PathClassifier::from_config(&config.risk)?;
            let sanitized = DiffSanitizer::with_classifier(config.sanitize, classifier)
                .sanitize(parse_unified_diff(&diff));
            let files = changed_files(&sanitized.kept);
            let analysis = TitleAnalyzer::from_config(&config.title)?.analyze(title, &diff, &files);

            match cli.format {
                OutputFormat::Json => print_json(&analysis)?,
                OutputFormat::Markdown => print!("{}", analysis.to_markdown()),
                OutputFormat::Text => println!("{analysis}"),
            }
        }
        Some(Command::Tickets {
            ref title,
            ref body,
            ref commits,
        }) => {
            let detector = TicketDetector::new(&config.tickets)?;
            let refs = detector.detect_from_sources(title, body, commits);

            match cli.format {
                OutputFormat::Json => print_json(&refs)?,
                OutputFormat::Markdown => println!("{}", format_markdown(&refs)),
                OutputFormat::Text => {
                    if refs.is_empty() {
                        println!("No related tickets found.");
                    }
                    for ticket in &refs {
                        println!("{ticket}");
                    }
                }
            }
        }
        Some(Command::Report { ref input }) => {
            let raw = read_input(input)?;
            let input: ReportInput = serde_json::from_str(&raw)
                .into_diagnostic()
                .wrap_err("parsing report input JSON")?;
            let report = AnalysisPipeline::from_config(&config)?.run(&input);

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Markdown => print!("{}", report.to_markdown()),
                OutputFormat::Text => print!("{report}"),
            }
        }
        Some(Command::Init) => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                miette::bail!("{DEFAULT_CONFIG_PATH} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {DEFAULT_CONFIG_PATH} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "prlens", &mut std::io::stdout());
        }
    }

    Ok(())
}
