//! Route commands

use anyhow::Result;
use fueleu_business::{RouteService, ServiceContext};
use fueleu_core::Route;

use super::print_json;
use crate::RouteAction;

pub async fn handle(ctx: &ServiceContext, action: RouteAction, json: bool) -> Result<()> {
    let service = RouteService::new(ctx);

    match action {
        RouteAction::List => {
            let routes = service.list().await?;
            if json {
                return print_json(&routes);
            }

            let energy_factor = ctx.config().energy_factor;
            println!("🚢 Routes ({})", routes.len());
            println!(
                "{:<6} {:<12} {:<5} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
                "ID", "Vessel", "Fuel", "Year", "gCO2e/MJ", "Calc", "Fuel (t)", "Dist (km)", "CO2e (t)", ""
            );
            for r in &routes {
                // intensity suy ra từ emissions / energy, để đối chiếu với số khai báo
                let computed = r
                    .computed_intensity(energy_factor)
                    .map_or_else(|_| "-".to_string(), |v| v.round_dp(2).to_string());
                println!(
                    "{:<6} {:<12} {:<5} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10}  {}",
                    r.route_id,
                    r.vessel_type,
                    r.fuel_type,
                    r.year,
                    r.ghg_intensity,
                    computed,
                    r.fuel_consumption,
                    r.distance,
                    r.total_emissions,
                    if r.is_baseline { "⭐ baseline" } else { "" }
                );
            }
        }
        RouteAction::Add {
            route_id,
            vessel,
            fuel,
            year,
            intensity,
            fuel_consumption,
            distance,
            emissions,
        } => {
            let route = Route {
                id: 0,
                route_id,
                vessel_type: vessel,
                fuel_type: fuel,
                year,
                ghg_intensity: intensity,
                fuel_consumption,
                distance,
                total_emissions: emissions,
                is_baseline: false,
            };
            let saved = service.save(&route).await?;
            if json {
                return print_json(&saved);
            }
            println!("✅ Route {} saved (id {})", saved.route_id, saved.id);
        }
        RouteAction::Baseline { route_id } => {
            let route = service.set_baseline_by_route_id(&route_id).await?;
            if json {
                return print_json(&route);
            }
            println!("⭐ Baseline set to {} ({} gCO2e/MJ)", route.route_id, route.ghg_intensity);
        }
        RouteAction::Compare => {
            let report = service.compare().await?;
            if json {
                return print_json(&report);
            }

            println!(
                "📊 Baseline {} ({} gCO2e/MJ), target {} gCO2e/MJ",
                report.baseline.route_id, report.baseline.ghg_intensity, report.target
            );
            println!("{:<6} {:>10} {:>10}  {:<10} {}", "ID", "gCO2e/MJ", "% diff", "Compliant", "");
            for row in &report.comparisons {
                println!(
                    "{:<6} {:>10} {:>10}  {:<10} {}",
                    row.route_id,
                    row.ghg_intensity,
                    row.percent_diff,
                    if row.compliant { "✅" } else { "❌" },
                    if row.improved { "improved" } else { "" }
                );
            }
        }
    }

    Ok(())
}
