use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use registry_api::api::{self, AppState};
use registry_api::config::{self, Service};
use registry_api::db;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Registry to serve; overrides `service` in the config file
    #[arg(long, value_enum)]
    service: Option<Service>,

    /// Print an example config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if args.print_config {
        print!("{}", config::example());
        return Ok(());
    }

    let mut cfg = config::load(Some(&args.config))?;
    if let Some(service) = args.service {
        cfg.service = service;
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        cfg.database.url = url;
    }

    let pool = db::init_pool(&cfg.database).await?;
    if cfg.database.migrate {
        db::run_migrations(&pool).await?;
    }
    info!(service = %cfg.service, database = %cfg.database.url, "starting registry");

    api::serve(&cfg, AppState::new(pool.clone())).await?;

    pool.close().await;
    Ok(())
}
