//! # docsearch CLI
//!
//! Command-line interface for docsearch, semantic search over uploaded
//! documents. Each invocation is one session: the given files are
//! uploaded, queries are ranked against them, and the query ledger can be
//! written out as CSV.
//!
//! ## Commands
//!
//! - `docsearch search <QUERY> --file <PATH>...` - Run a single query
//! - `docsearch interactive --file <PATH>...` - Read queries from stdin
//! - `docsearch config show|init|path` - Manage configuration
//!
//! ## Examples
//!
//! ```bash
//! # Rank two documents against a query
//! docsearch search "quarterly revenue" --file report.pdf --file notes.txt
//!
//! # Get JSON output
//! docsearch search "auth" --file handbook.docx --format json
//!
//! # Keep the query ledger
//! docsearch interactive --file a.txt --file b.xlsx --log queries.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docsearch_core::{format_score, DocumentBody, SearchError};
use docsearch_embed::HashEmbedder;
use docsearch_session::Session;
use serde::Serialize;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Semantic search over uploaded documents")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docsearch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload files and run a single query against them
    Search {
        /// Query string
        query: String,

        /// File to upload (repeatable)
        #[arg(short = 'F', long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Maximum results (defaults to config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the query ledger CSV to this path
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Upload files, then read queries from stdin until EOF
    Interactive {
        /// File to upload (repeatable)
        #[arg(short = 'F', long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Maximum results (defaults to config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Write the query ledger CSV to this path on exit
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for query results.
#[derive(Serialize)]
struct QueryOutput {
    query: String,
    results: Vec<ResultItem>,
}

#[derive(Serialize)]
struct ResultItem {
    file: String,
    score: f32,
    preview: String,
}

/// Build a session and upload the given files into it.
async fn create_session(
    config: &Config,
    files: &[PathBuf],
    limit: Option<usize>,
) -> Result<Session> {
    let embedder = Arc::new(HashEmbedder::with_dimension(config.embedding.dimension));
    let mut session =
        Session::new(embedder).with_top_k(limit.unwrap_or(config.search.top_k));

    for path in files {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        session.upload(&name, &data).await;
    }

    info!("{} file(s) uploaded", session.corpus().len());
    for doc in session.corpus().iter() {
        if let DocumentBody::Failed { error } = &doc.body {
            eprintln!("warning: {}: {}", doc.name, error);
        }
    }

    Ok(session)
}

/// Run one query and print the outcome.
///
/// Precondition failures are reported, not fatal; provider failures abort
/// the command.
async fn run_query(session: &mut Session, query: &str, format: OutputFormat) -> Result<()> {
    match session.search(query).await {
        Ok(results) => match format {
            OutputFormat::Json => {
                let output = QueryOutput {
                    query: query.to_string(),
                    results: results
                        .iter()
                        .map(|r| ResultItem {
                            file: r.name.clone(),
                            score: r.score,
                            preview: truncate(&r.preview, 100),
                        })
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                println!("Query: {query}\n");
                for (i, result) in results.iter().enumerate() {
                    println!(
                        "{}. {} (score: {})",
                        i + 1,
                        result.name,
                        format_score(result.score)
                    );
                    println!("   {}", truncate(&result.preview, 100));
                    println!();
                }
            }
        },
        Err(SearchError::NoDocuments) => {
            println!("No documents are available for search. Upload files first.");
        }
        Err(SearchError::InvalidQuery) => {
            println!("Please enter a non-empty search query.");
        }
        Err(err @ SearchError::Embedding(_)) => {
            return Err(err).context("Query execution failed");
        }
    }
    Ok(())
}

/// Write the ledger CSV if a path was requested.
fn write_log(session: &Session, log: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = log {
        let bytes = session.export_log().context("Failed to export query log")?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Query log written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // Load config from file or CLI-specified path
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path.clone())
            .with_context(|| format!("Failed to load config from {}", path.display()))?
    } else {
        Config::load().context("Failed to load config")?
    };

    match cli.command {
        Commands::Search {
            query,
            files,
            limit,
            log,
        } => {
            let mut session = create_session(&config, &files, limit).await?;
            run_query(&mut session, &query, cli.format).await?;
            write_log(&session, log.as_ref())?;
        }

        Commands::Interactive { files, limit, log } => {
            let mut session = create_session(&config, &files, limit).await?;
            println!("Enter queries, one per line (Ctrl-D or \"exit\" to quit).");

            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let query = line.context("Failed to read from stdin")?;
                if query == "exit" || query == "quit" {
                    break;
                }
                run_query(&mut session, &query, cli.format).await?;
            }

            println!("{} queries recorded.", session.ledger().len());
            write_log(&session, log.as_ref())?;
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&config)
                            .context("Failed to serialize config")?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

/// Truncate a string to a maximum number of characters, adding an
/// ellipsis if needed.
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace(['\n', '\r'], " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
