//! Database initialization and status

use anyhow::{Context, Result};
use fueleu_persistence::{BankRepo, ComplianceRepo, Database, PoolRepo, RouteRepo};
use std::path::Path;

fn db_url(db_path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", db_path.display())
}

/// Initialize the database with schema and reference routes
pub async fn init_database(db_path: &Path, events_dir: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    println!("📦 Applying migrations...");
    let db = Database::open(&db_url(db_path), events_dir)
        .await
        .context("Failed to initialize database")?;

    println!("🌱 Seeding reference routes...");
    let inserted = db.seed().await.context("Failed to seed routes")?;
    println!("   {} route(s) added", inserted);

    db.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path, events_dir: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'fueleu init' to create the database");
        return Ok(());
    }

    let db = connect(db_path, events_dir).await?;
    let mut conn = db.pool().acquire().await?;

    let routes = RouteRepo::count(&mut conn).await?;
    let baseline = RouteRepo::find_baseline(&mut conn).await?;
    let records = ComplianceRepo::find_all(&mut conn).await?.len();
    let entries = BankRepo::find_all(&mut conn).await?.len();
    let pools = PoolRepo::find_all(&mut conn).await?.len();
    drop(conn);

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();
    println!("   Routes:             {}", routes);
    println!(
        "   Baseline:           {}",
        baseline.map_or_else(|| "-".to_string(), |r| r.route_id)
    );
    println!("   Compliance records: {}", records);
    println!("   Bank entries:       {}", entries);
    println!("   Pools:              {}", pools);

    db.close().await;
    Ok(())
}

/// Open an existing database (migrations applied, nothing seeded)
pub async fn connect(db_path: &Path, events_dir: &Path) -> Result<Database> {
    if !db_path.exists() {
        anyhow::bail!("Database not found at {:?}. Run 'fueleu init' first.", db_path);
    }
    Database::open(&db_url(db_path), events_dir)
        .await
        .context("Failed to connect to database")
}
