//! Webscrape main entry point
//!
//! This is the command-line interface for the Webscrape extraction engine.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use webscrape::config::{config_fingerprint, load_config, ExtractionConfig, ScrapePlan};
use webscrape::output::{JsonSink, RecordSink, SqliteSink};
use webscrape::Crawler;

/// Webscrape: declarative web extraction
///
/// Extracts structured records from web pages using CSS selector rules,
/// following "next page" links up to a configured page cap.
#[derive(Parser, Debug)]
#[command(name = "webscrape")]
#[command(version = "1.0.0")]
#[command(about = "Declarative CSS-selector web extraction", long_about = None)]
struct Cli {
    /// Path to a TOML or JSON extraction configuration
    #[arg(value_name = "CONFIG", required_unless_present = "url")]
    config: Option<PathBuf>,

    /// Scrape a single page with the general-purpose overview selectors
    #[arg(long, conflicts_with = "config")]
    url: Option<String>,

    /// Write the result as JSON to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Also upsert the records into this SQLite database
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Validate the configuration and show the plan without fetching
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match (&cli.config, &cli.url) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        (None, Some(url)) => ExtractionConfig::page_overview(url.as_str()),
        (None, None) => bail!("either a CONFIG file or --url is required"),
    };

    let plan = ScrapePlan::compile(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &plan);
        return Ok(());
    }

    handle_scrape(&cli, &config, &plan).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webscrape=info,warn"),
            1 => EnvFilter::new("webscrape=debug,info"),
            2 => EnvFilter::new("webscrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows what would be scraped
fn handle_dry_run(config: &ExtractionConfig, plan: &ScrapePlan) {
    println!("=== Webscrape Dry Run ===\n");

    println!("Start URL: {}", plan.start_url);
    println!("Max pages: {}", plan.max_pages);
    println!("Timeout: {}s", plan.timeout.as_secs());

    match config.container() {
        Some(container) => println!("Container: {}", container),
        None => println!("Container: (whole document)"),
    }

    println!("\nFields ({}):", plan.extraction.field_names().count());
    for (name, rule) in config.fields() {
        println!("  - {} = {}", name, rule);
    }

    match &config.pagination {
        Some(pagination) => println!(
            "\nPagination: {} (attribute: {})",
            pagination.selector,
            pagination.attr.as_deref().unwrap_or("href")
        ),
        None => println!("\nPagination: none"),
    }

    println!("\nHeaders ({}):", plan.headers.len());
    for (name, value) in &plan.headers {
        println!("  - {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main scrape operation
async fn handle_scrape(cli: &Cli, config: &ExtractionConfig, plan: &ScrapePlan) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling scrape");
            ctrl_c_token.cancel();
        }
    });

    let crawler = Crawler::new()
        .context("Failed to build HTTP client")?
        .with_cancellation(token);

    let result = match crawler.run(&config.url, plan).await {
        Ok(result) => {
            tracing::info!(
                "Scrape completed: {} record(s) from {} page(s)",
                result.data.len(),
                result.pages_visited
            );
            result
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    let config_hash = config_fingerprint(config)?;

    if let Some(database) = &cli.database {
        let mut sink = SqliteSink::new(database)
            .with_context(|| format!("Failed to open database {}", database.display()))?;
        let stored = sink.store(&result, &config_hash)?;
        tracing::info!("Stored {} record(s) in {}", stored, database.display());
    }

    match &cli.output {
        Some(path) => write_json_file(path, &result, &config_hash)?,
        None => {
            let stdout = std::io::stdout();
            JsonSink::new(stdout.lock()).store(&result, &config_hash)?;
        }
    }

    Ok(())
}

fn write_json_file(
    path: &Path,
    result: &webscrape::ScrapeResult,
    config_hash: &str,
) -> anyhow::Result<()> {
    let mut sink = JsonSink::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    sink.store(result, config_hash)?;
    tracing::info!("Result written to: {}", path.display());
    Ok(())
}
