//! qa_board - Q&A forum API server
//!
//! ```text
//! config/<env>.yaml ─▶ logging ─▶ store (postgres | memory) ─▶ axum router
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use qa_board::api::{self, error::set_expose_internal_errors, state::AppState};
use qa_board::auth::AuthService;
use qa_board::config::{AppConfig, StorageKind};
use qa_board::db::{Database, schema::init_schema};
use qa_board::forum::{MemoryStore, PgStore, QaStore};
use qa_board::logging::init_logging;

#[derive(Parser, Debug)]
#[command(version, about = "Q&A forum API server")]
struct Args {
    /// Selects config/<env>.yaml
    #[arg(long, default_value = "dev")]
    env: String,

    /// Overrides server.port and PORT
    #[arg(long)]
    port: Option<u16>,
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn QaStore>> {
    match config.storage {
        StorageKind::Postgres => {
            let db = Database::connect(
                &config.database.url,
                config.database.max_connections,
                config.database.acquire_timeout_secs,
            )
            .await
            .context("Failed to connect to PostgreSQL")?;
            init_schema(db.pool()).await?;
            Ok(Arc::new(PgStore::new(db.pool().clone())))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.env)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let _log_guard = init_logging(&config);
    set_expose_internal_errors(config.expose_internal_errors);

    tracing::info!(
        env = %args.env,
        storage = ?config.storage,
        version = api::handlers::health::VERSION,
        "Starting qa_board"
    );

    let store = open_store(&config).await?;
    let auth = AuthService::new(
        store.clone(),
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_hours,
    );
    let state = Arc::new(AppState::new(store, auth, config.auth.allow_admin_bootstrap));

    api::run_server(&config.server, state).await
}
