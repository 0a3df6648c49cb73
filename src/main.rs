//! Soundtrawl main entry point
//!
//! This is the command-line interface for the Soundtrawl sound harvester.

use anyhow::Context;
use clap::Parser;
use soundtrawl::config::{load_config_with_hash, validate, Config};
use soundtrawl::crawler::run;
use soundtrawl::interact::{JsonCredentialStore, TerminalPrompter};
use soundtrawl::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Soundtrawl: an authenticated sound-library harvester
///
/// Soundtrawl logs into the site, walks the pages of a search, and downloads
/// every result into a per-query directory, skipping files already present.
#[derive(Parser, Debug)]
#[command(name = "soundtrawl")]
#[command(version)]
#[command(about = "Search a sound library and download the results", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// First search query (prompted for when omitted)
    #[arg(long)]
    query: Option<String>,

    /// Root directory for downloads
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Path to the JSON credentials file
    #[arg(long, value_name = "FILE")]
    credentials: Option<PathBuf>,

    /// Pause between result pages, in milliseconds
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the effective configuration without logging in
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("soundtrawl=info,warn"),
            1 => EnvFilter::new("soundtrawl=debug,info"),
            2 => EnvFilter::new("soundtrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line values on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(query) = &cli.query {
        config.crawl.query = Some(query.trim().to_string());
    }
    if let Some(dest) = &cli.dest {
        config.download.destination_root = dest.clone();
    }
    if let Some(path) = &cli.credentials {
        config.credentials.path = path.clone();
    }
    if let Some(delay) = cli.delay_ms {
        config.crawl.page_delay_ms = delay;
    }
}

/// Handles the --dry-run mode: shows what a run would use
fn handle_dry_run(config: &Config) {
    println!("=== Soundtrawl Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  User agent: {}", config.site.user_agent);

    println!("\nCrawl:");
    println!("  Page delay: {}ms", config.crawl.page_delay_ms);
    match &config.crawl.query {
        Some(query) => println!("  First query: {}", query),
        None => println!("  First query: (prompted)"),
    }

    println!("\nDownloads:");
    println!("  Destination: {}", config.download.destination_root.display());
    println!("  Chunk size: {} bytes", config.download.chunk_size);
    println!("  Fallback extension: .{}", config.download.fallback_extension);

    println!("\nCredentials file: {}", config.credentials.path.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
///
/// Prompts block the calling task, so Ctrl-C is watched from a separate
/// task that ends the process directly. An in-flight download only ever
/// leaves a hidden `.part` file behind, never a file under its final name.
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Process was interrupted by user.");
            std::process::exit(130);
        }
    });

    let store = JsonCredentialStore::new(&config.credentials.path);
    let mut prompter = TerminalPrompter::stdio();

    match run(&config, &store, &mut prompter).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
