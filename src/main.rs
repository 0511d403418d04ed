//! Athenaeum Server
//!
//! `athenaeum serve` runs the HTTP server, `athenaeum console` the library menu.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use athenaeum_server::{
    config::{AppConfig, LoggingConfig},
    console::LibraryConsole,
    create_router, db,
    repository::Repository,
    services::{
        seed::{seed_employees, DataLoader},
        Services,
    },
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "athenaeum", version, about = "Library lending and staff directory")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Skip the first-boot data import and employee seeding
    #[arg(long, global = true)]
    no_seed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Run the HTTP server (employee pages and library API)
    Serve,
    /// Run the interactive library menu
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_tracing(&config.logging, command == Command::Console)?;

    tracing::info!("Starting Athenaeum v{}", env!("CARGO_PKG_VERSION"));

    let pool = db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    db::migrate(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations completed");

    let services = Services::new(Repository::new(pool));

    if cli.no_seed {
        tracing::info!("Seeding disabled");
    } else {
        let loader = DataLoader::new(
            services.books.clone(),
            services.members.clone(),
            &config.library.data_dir,
        );
        loader.load_initial_data().await?;

        if command == Command::Serve {
            seed_employees(&services.employees, config.library.seed_employees).await?;
        }
    }

    match command {
        Command::Serve => serve(config, services).await,
        Command::Console => {
            let mut console = LibraryConsole::new(
                services,
                tokio::io::BufReader::new(tokio::io::stdin()),
                tokio::io::stdout(),
            );
            console.run().await?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, services: Services) -> anyhow::Result<()> {
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", config.server.host))?,
        config.server.port,
    );

    let state = AppState {
        services: Arc::new(services),
    };
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber. Console mode logs to a daily file so
/// records do not interleave with the menu.
fn init_tracing(config: &LoggingConfig, to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "athenaeum={level},athenaeum_server={level},tower_http=debug",
            level = config.level
        )
        .into()
    });

    let (writer, guard) = if to_file {
        std::fs::create_dir_all(&config.directory).with_context(|| {
            format!("Failed to create log directory {}", config.directory.display())
        })?;
        let appender = tracing_appender::rolling::daily(&config.directory, "athenaeum.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        (BoxMakeWriter::new(writer), Some(guard))
    } else {
        (BoxMakeWriter::new(std::io::stdout), None)
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(!to_file)
                    .with_writer(writer),
            )
            .init();
    }

    Ok(guard)
}
