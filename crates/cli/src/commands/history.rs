//! Audit trail command

use anyhow::Result;
use fueleu_business::{AuditService, ServiceContext};
use fueleu_persistence::EventFilter;

use super::print_json;
use crate::EventTypeArg;

pub fn show(
    ctx: &ServiceContext,
    ship: Option<String>,
    year: Option<i32>,
    types: Vec<EventTypeArg>,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> Result<()> {
    let mut filter = EventFilter::new();
    if let Some(ship) = &ship {
        filter = filter.ship(ship);
    }
    if let Some(year) = year {
        filter = filter.year(year);
    }
    if !types.is_empty() {
        filter = filter.event_types(types.iter().map(|t| t.to_core_type()).collect());
    }

    let events = AuditService::new(ctx).history(&filter, from.as_deref(), to.as_deref())?;
    if json {
        return print_json(&events);
    }

    println!("📜 Audit trail ({} event(s))", events.len());
    for e in &events {
        println!(
            "{} {} {:<22} {:<8} {:>6} {}",
            e.event_id,
            e.timestamp.format("%Y-%m-%d %H:%M:%S"),
            e.event_type,
            e.ship_id.as_deref().unwrap_or("-"),
            e.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
            e.amount.map_or_else(String::new, |a| a.to_string())
        );
    }

    Ok(())
}
