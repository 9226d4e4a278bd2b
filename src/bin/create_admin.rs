//! Operator tool: create an admin account directly in the database.
//!
//! Usage:
//!   cargo run --bin create_admin -- --env prod --username alice

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use qa_board::auth::AuthService;
use qa_board::config::{AppConfig, StorageKind};
use qa_board::db::{Database, schema::init_schema};
use qa_board::error::QaError;
use qa_board::forum::{Credentials, PgStore};
use qa_board::logging::init_cli_logging;

#[derive(Parser, Debug)]
#[command(version, about = "Create a Q&A admin account")]
struct Args {
    /// Selects config/<env>.yaml
    #[arg(long, default_value = "dev")]
    env: String,

    /// Prompted for when omitted
    #[arg(long)]
    username: Option<String>,
}

fn prompt(stdin: &mut impl BufRead, label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    if stdin.read_line(&mut line)? == 0 {
        bail!("stdin closed while reading {}", label);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_cli_logging("warn");
    let args = Args::parse();

    let config = AppConfig::read(&args.env)?;
    if config.storage != StorageKind::Postgres || config.database.url.trim().is_empty() {
        bail!("create_admin needs a PostgreSQL database; set DATABASE_URL or database.url");
    }

    let mut stdin = io::stdin().lock();
    let username = match args.username {
        Some(u) => u,
        None => prompt(&mut stdin, "Username")?,
    };
    let password = prompt(&mut stdin, "Password")?;
    let confirm = prompt(&mut stdin, "Confirm password")?;
    if password != confirm {
        bail!("Passwords do not match");
    }

    let db = Database::connect(&config.database.url, 1, config.database.acquire_timeout_secs)
        .await
        .context("Failed to connect to PostgreSQL")?;
    init_schema(db.pool()).await?;

    // Tokens are never issued here, so the secret is irrelevant.
    let auth = AuthService::new(
        Arc::new(PgStore::new(db.pool().clone())),
        String::new(),
        config.auth.token_ttl_hours,
    );

    match auth.create_admin(Credentials { username, password }).await {
        Ok(admin) => {
            println!("Admin '{}' created with id {}", admin.username, admin.id);
            Ok(())
        }
        Err(QaError::Validation(fields)) => {
            for f in &fields {
                eprintln!("  {}: {}", f.field, f.message);
            }
            bail!("Invalid admin credentials")
        }
        Err(e) => Err(e.into()),
    }
}
