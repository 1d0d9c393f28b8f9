//! `jar-license-inspector`: resolve the license of every JAR in a directory.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`config::load_config`]).
//! 3. For each `<name>-<version>.jar` ([`identity`]), find its groupId on
//!    Maven Central ([`registry::search`]), then read the license from the
//!    POM ([`registry::maven`]) or, failing that, from the JAR itself
//!    ([`analyzer::jar`]). License texts met on the way are saved
//!    ([`license::archiver`]).
//! 4. Print the table or JSON, write `license.html` ([`report`]).

mod analyzer;
mod cli;
mod config;
mod fetch;
mod identity;
mod license;
mod models;
mod pipeline;
mod registry;
mod report;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use cli::{Cli, ReportFormat};
use config::load_config;
use fetch::Fetcher;
use license::archiver::LicenseArchive;
use license::heuristic::PatternMatcher;
use pipeline::Inspector;
use registry::MavenCentral;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG > --quiet > -v > default
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !cli.directory.is_dir() {
        eprintln!(
            "{} {} is not a folder.",
            "Error:".red().bold(),
            cli.directory.display()
        );
        std::process::exit(1);
    }

    let config = load_config(Path::new("."), cli.config.as_deref())?;
    debug!(?config, "configuration loaded");

    let licenses_dir = cli.licenses_dir.unwrap_or(config.output.licenses_dir);
    let html_path = cli.html.unwrap_or(config.output.html);

    let fetcher = Fetcher::new(config.fetch.to_policy())?;
    debug!(policy = ?fetcher.policy(), "fetcher ready");
    let central = MavenCentral::new(
        fetcher,
        config.registry.search_url,
        config.registry.repository_url,
    );
    let archive = LicenseArchive::new(licenses_dir);
    let inspector = Inspector::new(central, archive.clone(), Box::new(PatternMatcher));

    if !cli.quiet {
        eprintln!(
            "\n {} v{}",
            "jar-license-inspector".bold(),
            env!("CARGO_PKG_VERSION")
        );
        eprintln!(" Scanning: {}\n", cli.directory.display());
    }

    let rows = inspector.inspect_directory(&cli.directory, cli.quiet).await?;

    if rows.is_empty() {
        eprintln!("No JAR files found in the specified directory.");
        return Ok(());
    }

    report::html::write(&rows, &html_path)?;
    if !cli.quiet {
        eprintln!(
            "  {} HTML table saved in: {}",
            "→".cyan(),
            html_path.display()
        );
        if archive.dir().is_dir() {
            eprintln!(
                "  {} License texts saved in: {}",
                "→".cyan(),
                archive.dir().display()
            );
        }
    }

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&rows),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}
