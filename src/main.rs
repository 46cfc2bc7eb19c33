use anyhow::Result;
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use mtgcards::config::{AppConfig, ConflictPolicy, MissingReferencePolicy};
use mtgcards::database::{establish_connection, get_database_url, seed_data, setup_database};
use mtgcards::services::{CardService, ImportService, NewEdition, ReferenceService};

use mtgcards::server;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// YAML configuration file
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,
    /// SQLite database path, overrides the configuration
    #[clap(short, long, global = true)]
    database: Option<String>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    Db {
        #[clap(subcommand)]
        command: DbCommands,
    },
    Edition {
        #[clap(subcommand)]
        command: EditionCommands,
    },
    Color {
        #[clap(subcommand)]
        command: ColorCommands,
    },
    /// Bulk import card records from a JSON file
    Import {
        file: PathBuf,
        /// Skip records with unknown editions or colors instead of stopping
        #[clap(long)]
        skip_missing: bool,
        /// Skip records whose id already exists instead of replacing them
        #[clap(long)]
        reject_duplicates: bool,
    },
    /// Print a random sample of cards
    Sample,
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    Init,
    Migrate {
        #[clap(subcommand)]
        direction: server::MigrateDirection,
    },
    /// Insert the five mana colors
    Seed,
}

#[derive(Subcommand, Debug)]
enum EditionCommands {
    Add {
        #[clap(short, long)]
        name: String,
        #[clap(long)]
        code: String,
    },
    List,
}

#[derive(Subcommand, Debug)]
enum ColorCommands {
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database.path = database;
    }

    match args.command {
        Commands::Serve { port, cors_origin } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if cors_origin.is_some() {
                config.server.cors_origin = cors_origin;
            }
            info!("Starting server on port {}", config.server.port);
            server::start_server(&config).await?;
        }
        Commands::Db { command } => match command {
            DbCommands::Init => {
                info!("Initializing database: {}", config.database.path);
                open_database(&config).await?;
            }
            DbCommands::Migrate { direction } => {
                info!("Running database migration: {:?}", direction);
                server::migrate_database(&config.database.path, direction).await?;
            }
            DbCommands::Seed => {
                let db = open_database(&config).await?;
                seed_data::seed_colors(&db).await?;
            }
        },
        Commands::Edition { command } => {
            let references = ReferenceService::new(open_database(&config).await?);
            match command {
                EditionCommands::Add { name, code } => {
                    let edition = references.create_edition(&NewEdition { name, code }).await?;
                    println!("{}", edition);
                }
                EditionCommands::List => {
                    for edition in references.list_editions().await? {
                        println!("{}", edition);
                    }
                }
            }
        }
        Commands::Color { command } => match command {
            ColorCommands::List => {
                let references = ReferenceService::new(open_database(&config).await?);
                for color in references.list_colors().await? {
                    println!("{} ({})", color, color.code.code());
                }
            }
        },
        Commands::Import {
            file,
            skip_missing,
            reject_duplicates,
        } => {
            if skip_missing {
                config.import.missing_reference = MissingReferencePolicy::Skip;
            }
            if reject_duplicates {
                config.import.conflict_policy = ConflictPolicy::Reject;
            }

            let db = open_database(&config).await?;
            let report = ImportService::new(db, config.import)
                .import_file(&file)
                .await?;
            for id in report.skipped_ids() {
                println!("skipped: {}", id);
            }
            println!(
                "{} imported, {} skipped",
                report.imported, report.skipped
            );
        }
        Commands::Sample => {
            let cards = CardService::new(open_database(&config).await?);
            for card in cards.random_sample().await? {
                println!("{}  {}", card.id, card);
            }
        }
    }

    Ok(())
}

async fn open_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let database_url = get_database_url(Some(&config.database.path));
    let db = establish_connection(&database_url).await?;
    setup_database(&db).await?;
    Ok(db)
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_deref()
        .unwrap_or("info")
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
