//! Command-line front end for the console core.
//!
//! # Responsibility
//! - Resolve settings from the config file and command-line overrides.
//! - Open the store, run one subcommand and print its result as JSON.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use trebisacce_core::{init_logging, open_db, AppConfig, SqliteRecordStore};

#[derive(Parser, Debug)]
#[command(name = "trebisacce", version, about = "Contacts, sales and treasury console")]
struct Cli {
    /// Settings file (TOML). Falls back to $TREBISACCE_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite file overriding `db_path` from the settings.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level overriding `log_level` from the settings.
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::resolve(cli.config.as_deref()).context("loading settings")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(log_dir) = config.log_dir.as_deref() {
        let log_dir = log_dir
            .to_str()
            .context("log_dir must be valid UTF-8")?;
        init_logging(&config.log_level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let store = SqliteRecordStore::configured(&conn, &config);

    let output = commands::run(cli.command, store, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
