//! Taxi Service - Backend Server
//!
//! Administration of a taxi fleet's manufacturers, cars and drivers.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taxi_service::{
    create_app, error::AppError, services::driver::NewDriver, services::DriverService, AppState,
    Config,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Taxi fleet administration server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations and start the HTTP server (default)
    Serve,
    /// Create a driver account that can log in
    CreateUser(CreateUserArgs),
}

#[derive(Args, Debug)]
struct CreateUserArgs {
    #[arg(long)]
    username: String,

    #[arg(long)]
    password: String,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long, default_value = "")]
    email: String,

    /// License number, three uppercase letters followed by five digits
    #[arg(long)]
    license_number: Option<String>,

    /// Mark the account as staff
    #[arg(long)]
    staff: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taxi_server=debug,taxi_service=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("failed to load configuration")?;

    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Migrations completed");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(db_pool, config).await,
        Command::CreateUser(args) => create_user(db_pool, args).await,
    }
}

async fn serve(db_pool: sqlx::PgPool, config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Taxi Service Server");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host or port")?;

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config),
    };

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn create_user(db_pool: sqlx::PgPool, args: CreateUserArgs) -> anyhow::Result<()> {
    let service = DriverService::new(db_pool);
    let input = NewDriver {
        username: args.username,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        license_number: args.license_number,
        is_staff: args.staff,
    };

    match service.create_driver(input).await {
        Ok(driver) => {
            println!("Created driver {} with id {}", driver, driver.id);
            Ok(())
        }
        Err(AppError::Validation { field, message }) => {
            anyhow::bail!("invalid {}: {}", field, message)
        }
        Err(e) => Err(e.into()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
