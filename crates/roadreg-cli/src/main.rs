//! `roadreg`: command-line front end for the road registry.
//!
//! # Usage
//!
//! ```text
//! roadreg register '23#$abCDEF' Alice Smith '123|Main St|Melbourne|Victoria|Australia' 01-01-2000
//! roadreg demerit '23#$abCDEF' 01-12-2024 3
//! roadreg --today 01-01-2025 update '23#$abCDEF' '23#$abCDEF' Alice Jones '123|Main St|Melbourne|Victoria|Australia' 01-01-2000
//! roadreg import persons.txt --demerits demerits.txt
//! ```
//!
//! Results are printed as JSON on stdout. A rejected operation prints
//! `{"error": <kind>, "message": ...}` on stderr and exits non-zero.

mod commands;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use roadreg_core::{
  Registry,
  clock::{Clock, FixedClock, SystemClock},
  person::NewPerson,
  validate,
};
use roadreg_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roadreg", author, version, about = "Registry of drivers and demerit points")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roadreg.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the config.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Use this date as today for age checks (default: the local date).
  #[arg(long, value_name = "DD-MM-YYYY", value_parser = parse_date)]
  today: Option<NaiveDate>,

  #[command(subcommand)]
  command: Command,
}

/// A person's details, in the textual form the validators accept.
#[derive(Args, Debug)]
struct PersonArgs {
  id:         String,
  first_name: String,
  last_name:  String,
  /// Five `|`-separated parts: number, street, city, state, country.
  address:    String,
  /// DD-MM-YYYY.
  birth_date: String,
}

impl From<PersonArgs> for NewPerson {
  fn from(a: PersonArgs) -> Self {
    NewPerson::new(a.id, a.first_name, a.last_name, a.address, a.birth_date)
  }
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Register a new person.
  Register(PersonArgs),

  /// Replace a person's details, subject to the update rules.
  Update {
    /// Identifier currently on record.
    target: String,
    #[command(flatten)]
    person: PersonArgs,
  },

  /// Record an offense and re-evaluate suspension.
  Demerit {
    id:           String,
    /// DD-MM-YYYY.
    offense_date: String,
    #[arg(allow_negative_numbers = true)]
    points:       i64,
  },

  /// Show one person.
  Show { id: String },

  /// List every person.
  List,

  /// List the offenses recorded for an identifier.
  Demerits { id: String },

  /// Import legacy pipe-delimited data files.
  Import {
    /// The legacy `persons.txt`.
    persons:  PathBuf,
    /// The legacy `demerits.txt`.
    #[arg(long)]
    demerits: Option<PathBuf>,
  },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
  validate::date(s).ok_or_else(|| format!("expected a DD-MM-YYYY date, got {s:?}"))
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file; `ROADREG_*` variables override it.
#[derive(Deserialize, Debug)]
struct Settings {
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
}

fn default_store_path() -> PathBuf { PathBuf::from("roadreg.db") }

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("ROADREG"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise settings")
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  // Logs go to stderr so stdout stays machine-readable.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = load_settings(&cli.config)?;
  let store_path = cli.store.unwrap_or(settings.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // One invocation is one short-lived command, so "today" is fixed up front.
  let today = cli.today.unwrap_or_else(|| SystemClock.today());
  tracing::debug!(store = ?store_path, %today, "registry opened");
  let registry = Registry::with_clock(store, FixedClock(today));

  match commands::run(&registry, cli.command).await {
    Ok(output) => {
      println!("{}", serde_json::to_string_pretty(&output)?);
      Ok(ExitCode::SUCCESS)
    }
    Err(e) => match e.downcast_ref::<roadreg_core::Error>() {
      Some(rejection) => {
        let body = serde_json::json!({
          "error":   rejection.kind(),
          "message": rejection.to_string(),
        });
        eprintln!("{body}");
        Ok(ExitCode::FAILURE)
      }
      None => Err(e),
    },
  }
}
