//! Compliance balance commands

use anyhow::Result;
use fueleu_business::{ComplianceService, ServiceContext};
use fueleu_core::ComplianceBalance;

use super::print_json;
use crate::ComplianceAction;

pub async fn handle(ctx: &ServiceContext, action: ComplianceAction, json: bool) -> Result<()> {
    let service = ComplianceService::new(ctx);

    match action {
        ComplianceAction::Cb { route, year } => {
            let balance = service.calculate_for_route(&route, year).await?;
            print_balance(&balance, json)?;
        }
        ComplianceAction::Compute {
            ship,
            year,
            intensity,
            fuel,
        } => {
            let balance = service.compute(&ship, year, intensity, fuel).await?;
            print_balance(&balance, json)?;
        }
        ComplianceAction::Adjusted { year } => {
            let rows = service.adjusted_cb(year).await?;
            if json {
                return print_json(&rows);
            }

            println!("📋 Adjusted CB {} ({} ship(s))", year, rows.len());
            for row in &rows {
                println!("   {:<10} {:>20}", row.ship_id, row.cb_gco2eq);
            }
        }
        ComplianceAction::Records { ship, year } => {
            let records = service.history(&ship, year).await?;
            if json {
                return print_json(&records);
            }

            println!("📜 CB records {} / {}", ship, year);
            if records.is_empty() {
                println!("   (none)");
            }
            for r in &records {
                println!(
                    "   #{:<5} {:>20}  {:<8} {}",
                    r.id,
                    r.cb_gco2eq,
                    r.status(),
                    r.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    Ok(())
}

fn print_balance(balance: &ComplianceBalance, json: bool) -> Result<()> {
    if json {
        return print_json(balance);
    }

    println!("⚖️  Compliance balance {} / {}", balance.ship_id, balance.year);
    println!("   Target:       {} gCO2e/MJ", balance.target_intensity);
    println!("   Actual:       {} gCO2e/MJ", balance.actual_intensity);
    println!("   Energy:       {} MJ", balance.energy_in_scope_mj);
    println!("   CB:           {} gCO2eq", balance.cb_gco2eq);
    println!("   Status:       {}", balance.status);
    Ok(())
}
