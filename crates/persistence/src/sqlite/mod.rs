//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    connect_in_memory, init_database, run_migrations, seed_routes, BankRepo, ComplianceRepo,
    EventSequenceRepo, PoolRepo, RouteRepo,
};
pub use schema::{BankEntryRow, ComplianceRow, PoolMemberRow, PoolRow, RouteRow};
