//! FuelEU CLI - compliance balance, banking and pooling from the command line
//!
//! Usage:
//! ```bash
//! fueleu init
//! fueleu routes add --route-id R006 --vessel Tanker --fuel LNG --year 2025 \
//!     --intensity 87.5 --fuel-consumption 3000 --distance 9000 --emissions 2500
//! fueleu routes compare
//! fueleu routes baseline R002
//! fueleu compliance cb --route R002 --year 2024
//! fueleu banking bank --ship R002 --year 2024 --amount 1000000
//! fueleu banking apply --ship S1 --year 2025 --amount 120
//! fueleu pools create --year 2025 --member S1=100 --member S2=-40 --member S3=-60
//! fueleu pools show 1
//! fueleu --json compliance adjusted --year 2025
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fueleu_business::{BusinessError, ServiceContext};
use fueleu_core::{CoreError, EventType, PoolMemberInput, RulesConfig};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod db;

use commands::{banking, compliance, history, pools, routes};

/// FuelEU - maritime GHG compliance ledger (SQLite + JSONL audit trail)
#[derive(Parser)]
#[command(name = "fueleu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path
    #[arg(long, default_value = "data/fueleu.db", global = true)]
    pub db: PathBuf,

    /// Events directory path
    #[arg(long, default_value = "data/events", global = true)]
    pub events_dir: PathBuf,

    /// Rules configuration (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema and reference routes
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Routes, baseline and comparison
    Routes {
        #[command(subcommand)]
        action: RouteAction,
    },

    /// Compliance balance calculation and queries
    Compliance {
        #[command(subcommand)]
        action: ComplianceAction,
    },

    /// Bank surplus and apply banked surplus
    Banking {
        #[command(subcommand)]
        action: BankingAction,
    },

    /// Create and list pools
    Pools {
        #[command(subcommand)]
        action: PoolAction,
    },

    /// Show the audit trail
    History {
        /// Only events involving this ship
        #[arg(long)]
        ship: Option<String>,
        /// Only events for this compliance year
        #[arg(long)]
        year: Option<i32>,
        /// Event types (comma-separated)
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<EventTypeArg>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RouteAction {
    /// List all routes
    List,
    /// Add a route, or update the route with the same ID
    Add {
        /// Route ID (e.g., R006)
        #[arg(long)]
        route_id: String,
        #[arg(long)]
        vessel: String,
        #[arg(long)]
        fuel: String,
        #[arg(long)]
        year: i32,
        /// GHG intensity (gCO2e/MJ)
        #[arg(long)]
        intensity: Decimal,
        /// Fuel consumption (t)
        #[arg(long)]
        fuel_consumption: Decimal,
        /// Distance (km)
        #[arg(long)]
        distance: Decimal,
        /// Total emissions (t)
        #[arg(long)]
        emissions: Decimal,
    },
    /// Make a route the single baseline
    Baseline {
        /// Route ID (e.g., R002)
        route_id: String,
    },
    /// Compare every route against the baseline
    Compare,
}

#[derive(Subcommand)]
pub enum ComplianceAction {
    /// Compute and record CB from a stored route
    Cb {
        /// Route ID, used as ship ID
        #[arg(long)]
        route: String,
        #[arg(long)]
        year: i32,
    },
    /// Compute and record CB from raw values
    Compute {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        year: i32,
        /// Actual GHG intensity (gCO2e/MJ)
        #[arg(long)]
        intensity: Decimal,
        /// Fuel consumption (t)
        #[arg(long)]
        fuel: Decimal,
    },
    /// Latest CB of every ship in a year
    Adjusted {
        #[arg(long)]
        year: i32,
    },
    /// All CB records of a ship/year, newest first
    Records {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        year: i32,
    },
}

#[derive(Subcommand)]
pub enum BankingAction {
    /// Bank a positive CB
    Bank {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        year: i32,
        /// Amount (gCO2eq)
        #[arg(long, allow_hyphen_values = true)]
        amount: Decimal,
    },
    /// Apply banked surplus to a year's CB (oldest entries first)
    Apply {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        year: i32,
        /// Amount (gCO2eq)
        #[arg(long, allow_hyphen_values = true)]
        amount: Decimal,
    },
    /// List bank entries of a ship
    Records {
        #[arg(long)]
        ship: String,
        #[arg(long)]
        year: Option<i32>,
    },
    /// Remaining banked surplus of a ship
    Balance {
        #[arg(long)]
        ship: String,
    },
}

#[derive(Subcommand)]
pub enum PoolAction {
    /// Create a pool from explicit members or from ships' latest CB
    Create {
        #[arg(long)]
        year: i32,
        /// Member as SHIP=CB (repeatable)
        #[arg(long = "member", value_parser = parse_member, allow_hyphen_values = true)]
        members: Vec<PoolMemberInput>,
        /// Ships to pool using their latest CB for the year (comma-separated)
        #[arg(long, value_delimiter = ',', conflicts_with = "members")]
        ships: Vec<String>,
    },
    /// List pools
    List {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show one pool with its members
    Show {
        /// Pool ID
        pool_id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EventTypeArg {
    BaselineSet,
    ComplianceCalculated,
    SurplusBanked,
    BankedApplied,
    PoolCreated,
}

impl EventTypeArg {
    pub fn to_core_type(self) -> EventType {
        match self {
            EventTypeArg::BaselineSet => EventType::BaselineSet,
            EventTypeArg::ComplianceCalculated => EventType::ComplianceCalculated,
            EventTypeArg::SurplusBanked => EventType::SurplusBanked,
            EventTypeArg::BankedApplied => EventType::BankedApplied,
            EventTypeArg::PoolCreated => EventType::PoolCreated,
        }
    }
}

/// Parse `SHIP=CB`
fn parse_member(value: &str) -> Result<PoolMemberInput, String> {
    let (ship_id, cb) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SHIP=CB, got '{}'", value))?;
    let cb: Decimal = cb
        .trim()
        .parse()
        .map_err(|e| format!("invalid CB '{}': {}", cb, e))?;
    Ok(PoolMemberInput::new(ship_id.trim(), cb))
}

fn load_config(path: Option<&PathBuf>) -> Result<RulesConfig> {
    let config = match path {
        Some(path) => RulesConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => RulesConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<()> {
    // Ensure data directories exist
    if let Some(parent) = cli.db.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {:?}", parent))?;
    }
    std::fs::create_dir_all(&cli.events_dir)
        .with_context(|| format!("Failed to create events directory {:?}", cli.events_dir))?;

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&cli.db, &cli.events_dir, force).await?;
            println!("✅ Database initialized at {:?}", cli.db);
            return Ok(());
        }
        Commands::Status => {
            return db::show_status(&cli.db, &cli.events_dir).await;
        }
        _ => {}
    }

    let config = load_config(cli.config.as_ref())?;
    tracing::debug!(
        target_intensity = %config.target_intensity,
        pooling_mode = ?config.pooling_mode,
        "rules config loaded"
    );
    let database = db::connect(&cli.db, &cli.events_dir).await?;
    let ctx = ServiceContext::new(&database, config);

    let result = match cli.command {
        Commands::Routes { action } => routes::handle(&ctx, action, cli.json).await,
        Commands::Compliance { action } => compliance::handle(&ctx, action, cli.json).await,
        Commands::Banking { action } => banking::handle(&ctx, action, cli.json).await,
        Commands::Pools { action } => pools::handle(&ctx, action, cli.json).await,
        Commands::History {
            ship,
            year,
            types,
            from,
            to,
        } => history::show(&ctx, ship, year, types, from, to, cli.json),
        Commands::Init { .. } | Commands::Status => Ok(()),
    };

    database.close().await;
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_line(&err));
            ExitCode::FAILURE
        }
    }
}

/// `[CODE] message` cho lỗi domain/business, còn lại in cả error chain
fn error_line(err: &anyhow::Error) -> String {
    if let Some(business) = err.downcast_ref::<BusinessError>() {
        return format!("[{}] {}", business.code(), business);
    }
    if let Some(core) = err.downcast_ref::<CoreError>() {
        return format!("[{}] {}", core.code(), core);
    }
    format!("Error: {:#}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_error_line_uses_codes() {
        let err = anyhow::Error::new(BusinessError::business_rule("Insufficient banked balance"));
        assert!(error_line(&err).starts_with("[BUSINESS_RULE_VIOLATION] "));

        let err = anyhow::Error::new(CoreError::validation("Target intensity must be positive."));
        assert!(error_line(&err).starts_with("[VALIDATION_ERROR] "));
        assert!(error_line(&err).ends_with("Target intensity must be positive."));

        let err = anyhow::anyhow!("disk full").context("Failed to create events directory");
        assert_eq!(error_line(&err), "Error: Failed to create events directory: disk full");
    }

    #[test]
    fn test_invalid_config_reports_validation_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, r#"{"target_intensity": "-1"}"#).unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(error_line(&err).starts_with("[VALIDATION_ERROR] "));
    }

    #[tokio::test]
    async fn test_unusable_data_dir_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "not a directory").unwrap();

        let cli = Cli::try_parse_from([
            OsString::from("fueleu"),
            OsString::from("--db"),
            blocker.join("fueleu.db").into_os_string(),
            OsString::from("--events-dir"),
            dir.path().join("events").into_os_string(),
            OsString::from("status"),
        ])
        .unwrap();

        let err = run(cli).await.unwrap_err();
        assert!(error_line(&err).starts_with("Error: Failed to create database directory"));
    }

    #[test]
    fn test_parse_member() {
        let member = parse_member("S2 = -40.5").unwrap();
        assert_eq!(member.ship_id, "S2");
        assert_eq!(member.cb_before, Decimal::new(-405, 1));
        assert!(parse_member("S2").is_err());
        assert!(parse_member("S2=abc").is_err());
    }
}
