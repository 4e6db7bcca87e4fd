//! Staybook CLI - Command-line interface
//!
//! Usage:
//!   staybook migrate
//!   staybook seed
//!   staybook hash-password <password>

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use staybook_api::auth::hash_password;
use staybook_api::init_tracing;
use staybook_core::config::AppConfig;
use staybook_core::seed::seed_catalog;
use staybook_core::PgStore;

#[derive(Parser)]
#[command(name = "staybook")]
#[command(about = "Staybook hotel booking administration CLI")]
#[command(version)]
struct Cli {
    /// TOML configuration file; environment variables still override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Apply migrations and load the sample hotel catalog
    Seed,
    /// Print an Argon2 hash for a password
    HashPassword {
        /// Password to hash
        password: String,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgStore> {
    let store = PgStore::connect(&config.database.url, config.database.pool_size).await?;
    store.migrate().await?;
    tracing::info!("Migrations applied");
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Migrate => {
            connect(&config).await?;
            println!("Database is up to date");
        }
        Commands::Seed => {
            let store = connect(&config).await?;
            let created = seed_catalog(&store).await?;
            if created == 0 {
                println!("Catalog already present, nothing to seed");
            } else {
                println!("Seeded {created} hotels");
            }
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
        }
    }

    Ok(())
}
