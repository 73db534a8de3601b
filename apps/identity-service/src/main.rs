use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth_cell::{ensure_admin, SeedOutcome};
use identity_service::{create_router, init_state};
use shared_config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "odontocare-identity", about = "OdontoCare identity service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the administrator account if it does not exist yet.
    SeedAdmin {
        #[arg(long, env = "ADMIN_USERNAME")]
        username: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::identity_from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::SeedAdmin { username, password } => seed_admin(config, &username, &password).await,
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting OdontoCare identity service");

    let bind_address = config.bind_address.clone();
    let state = init_state(config).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, app).await.context("identity server failed")
}

async fn seed_admin(config: AppConfig, username: &str, password: &str) -> Result<()> {
    let state = init_state(config).await?;

    match ensure_admin(&state.pool, username, password).await? {
        SeedOutcome::Created(user) => info!("Created admin user {} (id {})", user.username, user.id),
        SeedOutcome::AlreadyPresent(user) => info!("Admin user {} already exists", user.username),
    }

    Ok(())
}
