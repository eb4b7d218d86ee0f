//! Quartermaster Ledger Server
//!
//! HTTP service recording purchases, transfers and assignments of military
//! assets, with role-based access and per-base visibility.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use quartermaster_core::config::{self, Config};
use quartermaster_core::tracing_init::init_tracing;

use quartermaster_server::auth::JwtManager;
use quartermaster_server::seed::seed_defaults;
use quartermaster_server::server::{AppState, build_router};
use quartermaster_server::storage::LedgerDatabase;

#[derive(Parser, Debug)]
#[command(name = "quartermaster-server")]
#[command(version, about = "Quartermaster ledger server - asset movements with role-based access")]
struct Args {
    /// Address to listen on [default: 0.0.0.0:8080].
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Path to SQLite database file.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Secret used to sign session credentials.
    #[arg(long, env = "QUARTERMASTER_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Credential validity in seconds [default: 86400].
    #[arg(long)]
    token_ttl: Option<i64>,

    /// Allowed CORS origin (repeatable; `*` allows any).
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,

    /// JSON settings file, layered over the global settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Insert default principals and sample ledger data.
    #[arg(long)]
    seed: bool,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

impl Args {
    /// CLI flags win over file and environment settings.
    fn apply(&self, config: &mut Config) {
        if let Some(addr) = self.addr {
            config.server.addr = addr;
        }
        if let Some(path) = &self.db_path {
            config.server.database_path = Some(path.clone());
        }
        if let Some(ttl) = self.token_ttl {
            config.auth.token_ttl_secs = ttl;
        }
        if !self.cors_origins.is_empty() {
            config.server.cors_origins.clone_from(&self.cors_origins);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = config::load_config(args.config.as_deref())?;
    args.apply(&mut config);

    init_tracing(&config.server.log_level, args.log_json)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.addr,
        "Starting quartermaster-server"
    );

    if args.jwt_secret.trim().is_empty() {
        anyhow::bail!("QUARTERMASTER_JWT_SECRET must not be empty");
    }
    if config.auth.token_ttl_secs <= 0 {
        anyhow::bail!("Token TTL must be positive");
    }

    let db_path = match config.server.database_path.clone() {
        Some(path) => path,
        None => config::database_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine default database path"))?,
    };
    info!(path = %db_path.display(), "Opening ledger database");
    let db = LedgerDatabase::open(&db_path).await?;

    let jwt = Arc::new(JwtManager::new(
        args.jwt_secret.as_bytes(),
        config.auth.token_ttl_secs,
    ));
    let state = AppState::new(db.clone(), jwt);

    if args.seed {
        let report = seed_defaults(&db, &state.identity).await?;
        info!(
            principals = report.principals_created,
            catalog = report.catalog_seeded,
            "Seeding complete"
        );
    }

    let app = build_router(state, &config.server.cors_origins);
    let listener = tokio::net::TcpListener::bind(config.server.addr).await?;
    info!(addr = %config.server.addr, "Ledger server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Ledger server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}
