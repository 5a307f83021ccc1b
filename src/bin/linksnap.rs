//! Operator CLI for link-snap.
//!
//! Runs the extraction and rewrite pipeline from the terminal, using the same
//! configuration as the server.
//!
//! # Usage
//!
//! ```bash
//! # Show the links that would be shortened
//! cargo run --bin linksnap -- extract "see https://example.com/a and https://example.com/b"
//!
//! # Same, for an HTML message
//! cargo run --bin linksnap -- extract --mode markup "<a href='https://example.com'>x</a>"
//!
//! # Shorten for real (calls Bitly)
//! cargo run --bin linksnap -- rewrite "see https://example.com/a"
//!
//! # Validate configuration
//! cargo run --bin linksnap -- config
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `BITLY_ACCESS_TOKEN` is required for `rewrite` and `config`.

use link_snap::application::services::{ExtractionMode, LinkExtractor, RewriteService};
use link_snap::config;
use link_snap::domain::entities::OccurrenceSource;
use link_snap::domain::providers::LinkShortener;
use link_snap::infrastructure::shortener::BitlyShortener;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;

/// CLI tool for link-snap.
#[derive(Parser)]
#[command(name = "linksnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List the link occurrences found in a message
    Extract {
        /// Message text
        message: String,

        /// Extraction mode: pattern or markup (defaults to EXTRACTION_MODE)
        #[arg(short, long)]
        mode: Option<ExtractionMode>,
    },

    /// Shorten every link in a message via the configured provider
    Rewrite {
        /// Message text
        message: String,

        /// Extraction mode: pattern or markup (defaults to EXTRACTION_MODE)
        #[arg(short, long)]
        mode: Option<ExtractionMode>,
    },

    /// Validate configuration and print a summary
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { message, mode } => {
            let mode = mode.unwrap_or_else(mode_from_env);
            print_occurrences(&message, mode);
        }
        Commands::Rewrite { message, mode } => rewrite(&message, mode).await?,
        Commands::Config => show_config()?,
    }

    Ok(())
}

/// Reads `EXTRACTION_MODE` without requiring the rest of the configuration.
fn mode_from_env() -> ExtractionMode {
    std::env::var("EXTRACTION_MODE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Prints every occurrence with its position and source.
fn print_occurrences(message: &str, mode: ExtractionMode) {
    let occurrences = LinkExtractor::new(mode).extract(message);

    println!(
        "{} {}",
        "🔎 Extraction mode:".bright_blue().bold(),
        mode.to_string().cyan()
    );
    println!();

    if occurrences.is_empty() {
        println!("{}", "No links found".yellow());
        return;
    }

    for occ in &occurrences {
        let position = match &occ.span {
            Some(span) => format!("{}..{}", span.start, span.end),
            None => "unlocated".to_string(),
        };
        let source = match occ.source {
            OccurrenceSource::Pattern => "pattern",
            OccurrenceSource::Markup => "markup",
        };

        println!(
            "  {} {} {} {}",
            format!("#{}", occ.index).bright_white().bold(),
            occ.url.bright_cyan(),
            format!("[{}]", position).dimmed(),
            source.dimmed()
        );
    }

    println!();
    println!(
        "{}",
        format!("{} occurrence(s)", occurrences.len()).bright_white()
    );
}

/// Runs a full rewrite against the configured provider.
async fn rewrite(message: &str, mode: Option<ExtractionMode>) -> Result<()> {
    let config = config::load_from_env()?;
    let mode = mode.unwrap_or(config.extraction_mode);

    let shortener: Arc<dyn LinkShortener> = Arc::new(
        BitlyShortener::new(
            &config.bitly_api_url,
            &config.bitly_access_token,
            config.shorten_timeout(),
        )
        .context("Failed to build Bitly client")?,
    );
    let service = RewriteService::new(shortener, config.rewrite_limits());

    let occurrences = LinkExtractor::new(mode).extract(message);
    if occurrences.is_empty() {
        println!("{}", "No links found, message unchanged".yellow());
        println!("{}", message);
        return Ok(());
    }

    println!(
        "{}",
        format!("✂️  Shortening {} link(s)...", occurrences.len()).bright_blue()
    );

    match service.rewrite(message, &occurrences).await {
        Ok(outcome) => {
            for link in &outcome.links {
                println!(
                    "  {} {} {}",
                    link.long_url.dimmed(),
                    "→".bright_white(),
                    link.short_url.bright_green()
                );
            }
            println!();
            println!("{}", "✅ Rewritten message:".green().bold());
            println!("{}", outcome.message);
            Ok(())
        }
        Err(e) => {
            println!("{}", "❌ Rewrite failed, message left unchanged".red().bold());
            println!("  {}: {}", "URL".bright_white(), e.url.cyan());
            println!("  {}: {}", "Cause".bright_white(), e.source);
            Err(e.into())
        }
    }
}

/// Validates configuration and prints a masked summary.
fn show_config() -> Result<()> {
    let config = config::load_from_env()?;

    println!("{}", "⚙️  Configuration".bright_blue().bold());
    println!();
    println!("  Listen:           {}", config.listen_addr.cyan());
    println!("  Bitly endpoint:   {}", config.bitly_api_url.cyan());
    println!(
        "  Bitly token:      {}",
        config::mask_secret(&config.bitly_access_token).cyan()
    );
    println!(
        "  Extraction mode:  {}",
        config.extraction_mode.to_string().cyan()
    );
    println!(
        "  Timeout / limit:  {}s / {}",
        config.shorten_timeout_secs, config.max_concurrent_shorten
    );
    println!(
        "  Relay:            {}",
        if config.relay_enabled {
            config.telex_api_url.green()
        } else {
            "disabled".yellow()
        }
    );
    println!(
        "  Integration file: {}",
        config.integration_file.display().to_string().cyan()
    );
    println!();
    println!("{}", "✅ Configuration is valid".green().bold());

    Ok(())
}
