//! # Route Module
//!
//! Route là record của một voyage (vessel-year) với GHG intensity,
//! fuel consumption, distance, emissions và baseline flag.
//!
//! Route là plain data; validation và các đại lượng dẫn xuất là free
//! functions / methods không mutate.

use crate::amount::checked_product;
use crate::config::RulesConfig;
use crate::constants::GRAMS_PER_TONNE;
use crate::error::{CoreError, CoreResult};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Voyage record.
///
/// `id` = 0 nghĩa là route chưa được lưu; store sẽ gán id khi insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    /// Business key, unique (R001, R002, ...)
    pub route_id: String,
    pub vessel_type: String,
    pub fuel_type: String,
    pub year: i32,
    /// gCO2e/MJ
    pub ghg_intensity: Decimal,
    /// Fuel consumed (t)
    pub fuel_consumption: Decimal,
    /// Distance (km)
    pub distance: Decimal,
    /// Total emissions (t)
    pub total_emissions: Decimal,
    pub is_baseline: bool,
}

impl Route {
    /// Energy in scope (MJ) = fuel × energy factor
    pub fn energy_in_scope_mj(&self, energy_factor: Decimal) -> CoreResult<Decimal> {
        checked_product(self.fuel_consumption, energy_factor, "Energy in scope")
    }

    pub fn total_emissions_grams(&self) -> CoreResult<Decimal> {
        checked_product(self.total_emissions, GRAMS_PER_TONNE, "Total emissions")
    }

    /// Intensity tính từ emissions thực tế (g / MJ)
    pub fn computed_intensity(&self, energy_factor: Decimal) -> CoreResult<Decimal> {
        self.total_emissions_grams()?
            .checked_div(self.energy_in_scope_mj(energy_factor)?)
            .ok_or_else(|| CoreError::validation("Energy in scope must be positive."))
    }

    pub fn is_compliant(&self, target_intensity: Decimal) -> bool {
        self.ghg_intensity <= target_intensity
    }

    /// Validate route theo năm hiện tại
    pub fn validate(&self, config: &RulesConfig) -> CoreResult<()> {
        self.validate_for_year(config, Utc::now().year())
    }

    pub fn validate_for_year(&self, config: &RulesConfig, current_year: i32) -> CoreResult<()> {
        if self.id < 0 {
            return Err(CoreError::validation("Route must have a valid ID."));
        }
        if self.route_id.trim().is_empty() {
            return Err(CoreError::validation("Route ID is required."));
        }
        if !config.year_window(current_year).contains(&self.year) {
            return Err(CoreError::validation(format!("Invalid year: {}", self.year)));
        }
        if self.ghg_intensity <= Decimal::ZERO {
            return Err(CoreError::validation("GHG intensity must be positive."));
        }
        if self.fuel_consumption <= Decimal::ZERO {
            return Err(CoreError::validation("Fuel consumption must be positive."));
        }
        if self.distance <= Decimal::ZERO {
            return Err(CoreError::validation("Distance must be positive."));
        }
        self.energy_in_scope_mj(config.energy_factor)?;
        self.total_emissions_grams()?;
        Ok(())
    }
}
