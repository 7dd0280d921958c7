//! CLI command handlers

pub mod banking;
pub mod compliance;
pub mod history;
pub mod pools;
pub mod routes;

use anyhow::Result;
use serde::Serialize;

/// In kết quả dạng JSON (pretty) cho `--json`
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
