//! Pagelens command-line entry point
//!
//! One-shot mode for the library: crawl a single URL, print the report, and
//! exit. Ctrl-C cancels the running job through the same `stop` path the
//! owning service would use.

use anyhow::Context;
use clap::Parser;
use pagelens::config::load_config;
use pagelens::{Config, CrawlResult, JobManager};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Pagelens: single-page web crawl and analysis
///
/// Fetches one page, extracts its structural signals (title, HTML version,
/// headings, meta tags, login-form presence), classifies its links, and
/// reports the broken ones.
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(version)]
#[command(about = "Single-page web crawl and analysis", long_about = None)]
struct Cli {
    /// URL to crawl (scheme optional, defaults to https)
    #[arg(value_name = "URL")]
    url: String,

    /// Path to a TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Skip the broken-link check
    #[arg(long)]
    no_check: bool,

    /// Print the report as JSON instead of the human-readable layout
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// The identifier for the CLI's single job
const CLI_JOB_ID: u64 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if cli.no_check {
        config.checker.enabled = false;
    }

    let manager = JobManager::new(&config).context("failed to build HTTP clients")?;

    let (tx, rx) = tokio::sync::oneshot::channel();
    manager.start(CLI_JOB_ID, &cli.url, move |result| {
        let _ = tx.send(result);
    })?;

    let mut rx = rx;
    let result = tokio::select! {
        result = &mut rx => result.context("crawl task dropped without a result")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupt received, cancelling crawl");
            let _ = manager.stop(CLI_JOB_ID);
            rx.await.context("crawl task dropped without a result")?
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to serialize report")?
        );
    } else {
        print_report(&result);
    }

    if result.error.is_some() {
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagelens=info,warn"),
            1 => EnvFilter::new("pagelens=debug,info"),
            2 => EnvFilter::new("pagelens=trace,debug"),
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

/// Prints the crawl report in a human-readable layout
fn print_report(result: &CrawlResult) {
    println!("=== Pagelens Report ===\n");
    println!("URL: {}", result.url);

    if let Some(error) = &result.error {
        println!("Error: {}", error);
        return;
    }

    println!("Status: HTTP {}", result.status_code);
    println!("Title: {}", result.title);
    println!("HTML version: {}", result.html_version);
    println!("Login form: {}", if result.has_login_form { "yes" } else { "no" });

    println!("\nHeadings:");
    let h = &result.headings;
    for (level, count) in [h.h1, h.h2, h.h3, h.h4, h.h5, h.h6].iter().enumerate() {
        if *count > 0 {
            println!("  h{}: {}", level + 1, count);
        }
    }
    if h.total() == 0 {
        println!("  (none)");
    }

    println!("\nLinks:");
    println!("  Internal: {}", result.internal_links);
    println!("  External: {}", result.external_links);

    println!("\nMeta tags ({}):", result.meta_tags.len());
    let mut keys: Vec<&String> = result.meta_tags.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {}: {}", key, result.meta_tags[key]);
    }

    if result.broken_links.is_empty() {
        println!("\nBroken links: none");
    } else {
        println!("\nBroken links ({}):", result.broken_links.len());
        for broken in &result.broken_links {
            if broken.status_code == 0 {
                println!("  {} ({})", broken.url, broken.detail);
            } else {
                println!("  {} (HTTP {})", broken.url, broken.status_code);
            }
        }
    }
}
