//! # lms-bridge CLI (`lmsb`)
//!
//! The `lmsb` binary drives the metadata-to-vector-store bridge. It provides
//! commands for pushing an environment's tables, inspecting raw metadata
//! payloads, and starting the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! lmsb --config ./config/lmsb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lmsb push <env_id>` | Fetch an environment and push its tables |
//! | `lmsb fetch <env_id>` | Fetch an environment and write its JSON to a file |
//! | `lmsb envs` | List the configured environment roster |
//! | `lmsb serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use lms_bridge::models::{PushRequest, PushSummary, TableOutcome};
use lms_bridge::{config, dump, push, server};

/// lms-bridge — republish data-environment metadata into an LMS vector-store
/// index.
#[derive(Parser)]
#[command(
    name = "lmsb",
    about = "lms-bridge — republish data-environment metadata into an LMS vector-store index",
    version,
    long_about = "lms-bridge fetches environment metadata (systems, schemas, tables, columns) \
    from a metadata-management service and uploads one document per table into a vector-store \
    index for later retrieval."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lmsb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch an environment and push its tables to the vector store.
    ///
    /// Uploads one document per table and prints a per-table outcome.
    /// Individual upload failures do not abort the run.
    Push {
        /// Environment id known to the metadata service.
        env_id: String,

        /// Override the configured store name.
        #[arg(long)]
        store: Option<String>,

        /// Override the configured index name.
        #[arg(long)]
        index: Option<String>,
    },

    /// Fetch an environment and write its JSON to a local file.
    ///
    /// Inspection aid for the raw metadata payload; nothing is pushed.
    Fetch {
        /// Environment id known to the metadata service.
        env_id: String,

        /// Output path for the environment JSON.
        #[arg(long, default_value = "environment.json")]
        out: PathBuf,
    },

    /// List the configured environment roster.
    Envs,

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// `POST /push-to-lms/`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Push {
            env_id,
            store,
            index,
        } => {
            let request = PushRequest {
                environment_id: env_id,
                store_name: store.unwrap_or_else(|| cfg.lms.store_name.clone()),
                index_name: index.unwrap_or_else(|| cfg.lms.index_name.clone()),
            };
            let summary = push::run_push(&cfg, &request).await?;
            print_summary(&summary);
        }
        Commands::Fetch { env_id, out } => {
            dump::run_dump(&cfg, &env_id, &out).await?;
        }
        Commands::Envs => {
            if cfg.environments.is_empty() {
                println!("no environments configured");
            } else {
                for id in &cfg.environments {
                    println!("{id}");
                }
                println!("{} environments", cfg.environments.len());
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

fn print_summary(summary: &PushSummary) {
    println!("{}", summary.message);
    for outcome in &summary.results {
        match outcome {
            TableOutcome::Success {
                table_name,
                column_count,
                ..
            } => println!("  ok {} ({} columns)", table_name, column_count),
            TableOutcome::Error {
                table_name,
                error_message,
            } => println!("  error {}: {}", table_name, error_message),
        }
    }
    let ok = summary.results.iter().filter(|r| r.is_success()).count();
    println!("  pushed: {}/{} tables", ok, summary.environment.total_tables);
}
