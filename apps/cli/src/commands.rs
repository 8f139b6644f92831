//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use gleaner_core::{Orchestrator, ScrapeObserver, SilentObserver, SourceKind};
use gleaner_shared::{
    AppConfig, ContentType, GleanerError, KnowledgeBase, ScrapeConfig, init_config, load_config,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Gleaner: turn blogs, guides, and PDF books into one knowledge base.
#[derive(Parser)]
#[command(
    name = "gleaner",
    version,
    about = "Scrape blogs, interview guides, newsletters, and PDF books into a JSON knowledge base.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Scrape sources into a knowledge base and print it as JSON.
    Scrape {
        /// Source URLs.
        sources: Vec<String>,

        /// Additional source URLs as a JSON array of strings.
        #[arg(long)]
        urls_json: Option<String>,

        /// Local PDF file (repeatable).
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,

        /// Tenant id (defaults to `defaults.team_id` from the config file).
        #[arg(long)]
        team_id: Option<String>,

        /// Write the JSON here instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Hide the progress spinner.
        #[arg(long)]
        quiet: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

const LOG_TARGETS: &[&str] = &[
    "gleaner",
    "gleaner_core",
    "gleaner_crawler",
    "gleaner_markdown",
    "gleaner_shared",
];

/// Initialize tracing based on CLI flags. Logs go to stderr.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scrape {
            sources,
            urls_json,
            pdfs,
            team_id,
            out,
            quiet,
        } => {
            let sources = collect_sources(sources, urls_json.as_deref(), &pdfs)?;
            cmd_scrape(&sources, team_id, out, quiet).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Positional URLs, then `--urls-json` URLs, then PDF paths.
fn collect_sources(
    mut sources: Vec<String>,
    urls_json: Option<&str>,
    pdfs: &[PathBuf],
) -> Result<Vec<String>> {
    if let Some(raw) = urls_json {
        let urls: Vec<String> = serde_json::from_str(raw)
            .wrap_err("--urls-json must be a JSON array of strings")?;
        sources.extend(urls);
    }
    sources.extend(pdfs.iter().map(|p| p.to_string_lossy().into_owned()));

    if sources.is_empty() {
        return Err(eyre!("no sources given: pass URLs, --urls-json, or --pdf"));
    }
    Ok(sources)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_scrape(
    sources: &[String],
    team_id: Option<String>,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    let config = load_config()?;
    let team_id = team_id.unwrap_or_else(|| config.defaults.team_id.clone());
    let scrape_config = ScrapeConfig::from(&config);

    info!(sources = sources.len(), team_id = %team_id, "starting scrape");

    let orchestrator = Orchestrator::new(&scrape_config)?;
    let kb = if quiet {
        orchestrator.scrape_all(sources, &team_id, &SilentObserver).await
    } else {
        let progress = CliProgress::new();
        orchestrator.scrape_all(sources, &team_id, &progress).await
    };

    let json = serde_json::to_string_pretty(&kb)?;
    match out {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// One-line count of items per content type.
fn summary(kb: &KnowledgeBase) -> String {
    let count = |ty: ContentType| kb.items().iter().filter(|i| i.content_type == ty).count();
    format!(
        "{} items ({} blog, {} book, {} other)",
        kb.len(),
        count(ContentType::Blog),
        count(ContentType::Book),
        count(ContentType::Other),
    )
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Spinner on stderr showing the source being scraped.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ScrapeObserver for CliProgress {
    fn source_started(&self, source: &str, kind: SourceKind, index: usize, total: usize) {
        self.spinner
            .set_message(format!("[{}/{total}] {kind}: {source}", index + 1));
    }

    fn source_finished(&self, source: &str, items: usize) {
        self.spinner.println(format!("  {items:>4} items  {source}"));
    }

    fn source_failed(&self, source: &str, error: &GleanerError) {
        self.spinner.println(format!("  failed      {source}: {error}"));
    }

    fn done(&self, kb: &KnowledgeBase) {
        self.spinner.finish_and_clear();
        eprintln!("{}", summary(kb));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_keep_urls_before_pdfs() {
        let sources = collect_sources(
            vec!["https://interviewing.io/blog".into()],
            Some(r#"["https://quill.co/blog", "https://nilmamano.com/blog/category/dsa"]"#),
            &[PathBuf::from("book.pdf")],
        )
        .unwrap();

        assert_eq!(
            sources,
            [
                "https://interviewing.io/blog",
                "https://quill.co/blog",
                "https://nilmamano.com/blog/category/dsa",
                "book.pdf",
            ]
        );
    }

    #[test]
    fn malformed_urls_json_is_rejected() {
        assert!(collect_sources(Vec::new(), Some("https://quill.co"), &[]).is_err());
        assert!(collect_sources(Vec::new(), Some(r#"{"url": 1}"#), &[]).is_err());
    }

    #[test]
    fn at_least_one_source_required() {
        assert!(collect_sources(Vec::new(), None, &[]).is_err());
        assert!(collect_sources(Vec::new(), Some("[]"), &[]).is_err());
    }

    #[test]
    fn parses_scrape_flags() {
        let cli = Cli::try_parse_from([
            "gleaner",
            "-v",
            "--log-format",
            "json",
            "scrape",
            "https://quill.co/blog",
            "--pdf",
            "a.pdf",
            "--pdf",
            "b.pdf",
            "--team-id",
            "team-7",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.log_format, LogFormat::Json));
        let Command::Scrape {
            sources,
            pdfs,
            team_id,
            out,
            ..
        } = cli.command
        else {
            panic!("expected scrape command");
        };
        assert_eq!(sources, ["https://quill.co/blog"]);
        assert_eq!(pdfs, [PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);
        assert_eq!(team_id.as_deref(), Some("team-7"));
        assert!(out.is_none());
    }

    #[test]
    fn summary_counts_by_type() {
        use gleaner_shared::KnowledgeItem;

        let mut kb = KnowledgeBase::new("t");
        kb.extend([
            KnowledgeItem::new("t", "a", "", ContentType::Blog),
            KnowledgeItem::new("t", "b", "", ContentType::Book),
            KnowledgeItem::new("t", "c", "", ContentType::Book),
        ]);
        assert_eq!(summary(&kb), "3 items (1 blog, 2 book, 0 other)");
    }
}
