//! crm-tool - command-line access to saved import mappings and order pricing
//!
//! Resolves saved column mappings into import parser parameters and prices
//! form-style price selections against the stored price field catalog.

use anyhow::Result;
use clap::{Parser, Subcommand};
use crm_common::config::{DatabasePathResolver, ToolConfig};
use std::path::PathBuf;
use tracing::{info, warn};

mod commands;

/// Saved import mappings and order pricing
#[derive(Debug, Parser)]
#[command(name = "crm-tool", version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database (or open it) and make sure all tables exist
    Init,

    /// Saved import mappings
    #[command(subcommand)]
    Mapping(MappingCommand),

    /// Orders built from price field selections
    #[command(subcommand)]
    Order(OrderCommand),
}

#[derive(Debug, Subcommand)]
enum MappingCommand {
    /// Save mapping fields from a JSON array of rows
    Save {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// JSON file: [{"name": "First Name", "column_number": 0, ...}, ...]
        #[arg(long)]
        fields: PathBuf,
    },

    /// Resolve a saved mapping and print the import parser columns
    Show {
        #[arg(long)]
        mapping_id: i64,
        /// JSON field catalog: {"first_name": {"title": "First Name"}, ...}
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Individual, Household or Organization
        #[arg(long)]
        contact_type: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum OrderCommand {
    /// Price KEY=VALUE form input; keys other than price_<id> are ignored
    Total {
        #[arg(value_name = "KEY=VALUE")]
        input: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = ToolConfig::try_load_or_default(cli.config.as_deref());
    let log_level = loaded
        .as_ref()
        .map(|config| config.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Subscriber first, so config problems below are reported
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_or_defaults(loaded);

    let db_path = DatabasePathResolver::new(config.clone())
        .with_cli_arg(cli.database.clone())
        .resolve();
    info!("Database path: {}", db_path.display());

    let pool = crm_common::db::init_database(&db_path).await?;

    match cli.command {
        Command::Init => {
            info!("Database ready");
        }
        Command::Mapping(MappingCommand::Save {
            name,
            description,
            fields,
        }) => {
            let mapping_id =
                commands::save_mapping(&pool, &name, description.as_deref(), &fields).await?;
            println!("{}", mapping_id);
        }
        Command::Mapping(MappingCommand::Show {
            mapping_id,
            metadata,
            contact_type,
        }) => {
            let contact_type = contact_type.or(config.contact_type);
            let output =
                commands::show_mapping(&pool, mapping_id, metadata.as_deref(), contact_type.as_deref())
                    .await?;
            println!("{}", output);
        }
        Command::Order(OrderCommand::Total { input }) => {
            let output = commands::order_total(&pool, &input).await?;
            println!("{}", output);
        }
    }

    pool.close().await;
    Ok(())
}

/// Fall back to defaults on a bad config file, with a warning
fn config_or_defaults(loaded: crm_common::Result<ToolConfig>) -> ToolConfig {
    loaded.unwrap_or_else(|e| {
        warn!("Ignoring config file, using defaults: {}", e);
        ToolConfig::default()
    })
}
