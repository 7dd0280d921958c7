//! Pool commands

use anyhow::{bail, Result};
use fueleu_business::{PoolingService, ServiceContext};
use fueleu_core::PoolMember;

use super::print_json;
use crate::PoolAction;

pub async fn handle(ctx: &ServiceContext, action: PoolAction, json: bool) -> Result<()> {
    let service = PoolingService::new(ctx);

    match action {
        PoolAction::Create {
            year,
            members,
            ships,
        } => {
            let result = match (members.is_empty(), ships.is_empty()) {
                (false, _) => service.create_pool(year, &members).await?,
                (true, false) => service.create_pool_for_ships(year, &ships).await?,
                (true, true) => bail!("Provide --member SHIP=CB or --ships"),
            };
            if json {
                return print_json(&result);
            }

            println!("🤝 Pool #{} created for {}", result.pool_id, result.year);
            println!("   Pool sum: {}", result.pool_sum);
            print_members(&result.members);
        }
        PoolAction::List { year } => {
            let pools = service.list(year).await?;
            if json {
                return print_json(&pools);
            }

            println!("🤝 Pools ({})", pools.len());
            for pool in &pools {
                println!(
                    "\nPool #{} / {}  sum {}",
                    pool.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                    pool.year,
                    pool.total_before()?
                );
                print_members(&pool.members);
            }
        }
        PoolAction::Show { pool_id } => {
            let pool = service.get(pool_id).await?;
            if json {
                return print_json(&pool);
            }

            println!("🤝 Pool #{} / {}", pool_id, pool.year);
            println!("   Sum before: {}", pool.total_before()?);
            println!("   Sum after:  {}", pool.total_after()?);
            print_members(&pool.members);
        }
    }

    Ok(())
}

fn print_members(members: &[PoolMember]) {
    println!("   {:<10} {:>20} {:>20}", "Ship", "CB before", "CB after");
    for m in members {
        println!("   {:<10} {:>20} {:>20}", m.ship_id, m.cb_before, m.cb_after);
    }
}
