//! Banking commands

use anyhow::Result;
use fueleu_business::{BankingService, ServiceContext};

use super::print_json;
use crate::BankingAction;

pub async fn handle(ctx: &ServiceContext, action: BankingAction, json: bool) -> Result<()> {
    let service = BankingService::new(ctx);

    match action {
        BankingAction::Bank { ship, year, amount } => {
            let entry = service.bank_surplus(&ship, year, amount).await?;
            if json {
                return print_json(&entry);
            }
            println!("🏦 Banked {} gCO2eq for {} / {} (entry #{})", entry.amount, ship, year, entry.id);
        }
        BankingAction::Apply { ship, year, amount } => {
            let result = service.apply_banked(&ship, year, amount).await?;
            if json {
                return print_json(&result);
            }
            println!("✅ Applied {} gCO2eq to {} / {}", result.applied, ship, year);
            println!("   CB before: {}", result.cb_before);
            println!("   CB after:  {}", result.cb_after);
        }
        BankingAction::Records { ship, year } => {
            let entries = service.records(&ship, year).await?;
            if json {
                return print_json(&entries);
            }

            println!("🏦 Bank entries for {}", ship);
            if entries.is_empty() {
                println!("   (none)");
            }
            for e in &entries {
                println!(
                    "   #{:<5} {:>5} {:>20}  {}",
                    e.id,
                    e.year,
                    e.amount,
                    e.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        BankingAction::Balance { ship } => {
            let balance = service.balance(&ship).await?;
            if json {
                return print_json(&balance);
            }
            println!(
                "💰 {}: {} gCO2eq banked across {} entr(ies)",
                balance.ship_id, balance.balance, balance.entries
            );
        }
    }

    Ok(())
}
