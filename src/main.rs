//! Site-Crawler main entry point
//!
//! This is the command-line interface for the Site-Crawler same-site crawler.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use site_crawler::config::{load_config_with_hash, validate, Config, OutputFormat};
use site_crawler::crawler::{CrawlReport, CrawlSettings, Crawler};
use site_crawler::output::{
    print_statistics, ContextOutput, JsonOutput, MarkdownOutput, OutputHandler,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a same-site, depth-bounded web crawler
///
/// Site-Crawler walks a website breadth-first from its seed URLs, stays on
/// the seed's host, and writes one content record per visited page.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A same-site, depth-bounded web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URL to crawl (repeatable, replaces seeds from the config file)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Link hops to follow from the seeds
    #[arg(long)]
    depth: Option<u32>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    max_pages: Option<usize>,

    /// Minimum delay between requests, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Validate TLS certificates
    #[arg(long)]
    strict_tls: bool,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
    Context,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Context => OutputFormat::Context,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if config.seeds.is_empty() {
        bail!("No seed URLs given; pass --seed or list seeds in the config file");
    }

    let settings = config
        .crawl_settings()
        .context("Invalid crawl settings")?;

    if cli.dry_run {
        handle_dry_run(&config, &settings);
        return Ok(());
    }

    let report = handle_crawl(&config, settings).await?;
    write_report(&config, &report)?;

    if !cli.quiet {
        print_statistics(&report.stats, &report.records);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if !cli.seeds.is_empty() {
        config.seeds = cli.seeds.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.depth = depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if cli.strict_tls {
        config.fetcher.accept_invalid_certs = false;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, settings: &CrawlSettings) {
    println!("=== Site-Crawler Dry Run ===\n");

    println!("Crawl Settings:");
    println!("  Depth: {}", settings.depth);
    println!("  Max pages: {}", settings.max_pages);
    println!("  Delay: {:?}", settings.delay);
    println!(
        "  Fan-out caps: {} navigational, {} content",
        settings.fanout.navigational, settings.fanout.content
    );
    println!("  Priority keywords: {}", settings.priority_keywords.join(", "));

    println!("\nFetcher:");
    println!("  User agent: {}", settings.fetch.user_agent);
    println!("  Timeout: {:?}", settings.fetch.timeout);
    println!("  Max redirects: {}", settings.fetch.max_redirects);
    println!(
        "  TLS validation: {}",
        if settings.fetch.accept_invalid_certs {
            "disabled"
        } else {
            "enabled"
        }
    );

    println!("\nOutput:");
    println!("  Format: {:?}", config.output.format);
    println!(
        "  Destination: {}",
        config.output.path.as_deref().unwrap_or("stdout")
    );

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, settings: CrawlSettings) -> anyhow::Result<CrawlReport> {
    tracing::info!("Total seed URLs: {}", config.seeds.len());

    let mut crawler = Crawler::new(settings).context("Failed to create crawler")?;

    match crawler.crawl(config.seeds.as_slice()).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            Ok(report)
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Writes the report in the configured format and destination
fn write_report(config: &Config, report: &CrawlReport) -> anyhow::Result<()> {
    let writer: Box<dyn Write> = match &config.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let mut handler: Box<dyn OutputHandler> = match config.output.format {
        OutputFormat::Json => Box::new(JsonOutput::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownOutput::new(writer)),
        OutputFormat::Context => Box::new(ContextOutput::new(
            writer,
            config.output.context_prefix_chars,
        )),
    };

    handler
        .write_report(report)
        .context("Failed to write report")?;

    if let Some(path) = &config.output.path {
        tracing::info!("Report written to: {}", path);
    }

    Ok(())
}
