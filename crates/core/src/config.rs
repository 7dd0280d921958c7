//! Rules configuration
//!
//! Regulatory values mặc định lấy từ `constants`; có thể override qua
//! JSON file để thử nghiệm target khác mà không cần build lại.

use crate::constants::{ENERGY_FACTOR, MAX_YEAR_OFFSET, MIN_YEAR, TARGET_INTENSITY};
use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Configuration cho compliance rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// GHG intensity target (gCO2e/MJ)
    #[serde(default = "default_target_intensity")]
    pub target_intensity: Decimal,

    /// MJ per fuel unit
    #[serde(default = "default_energy_factor")]
    pub energy_factor: Decimal,

    /// Earliest accepted route year
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Years after the current year still accepted
    #[serde(default = "default_max_year_offset")]
    pub max_year_offset: i32,

    /// What to do with residual deficits after redistribution
    #[serde(default)]
    pub pooling_mode: PoolingMode,
}

/// Pooling post-check policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PoolingMode {
    /// Residual deficits are accepted when total surplus cannot cover them
    #[default]
    Tolerant,

    /// Any member left with cb_after < 0 rejects the pool
    Strict,
}

fn default_target_intensity() -> Decimal {
    TARGET_INTENSITY
}

fn default_energy_factor() -> Decimal {
    ENERGY_FACTOR
}

fn default_min_year() -> i32 {
    MIN_YEAR
}

fn default_max_year_offset() -> i32 {
    MAX_YEAR_OFFSET
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            target_intensity: default_target_intensity(),
            energy_factor: default_energy_factor(),
            min_year: default_min_year(),
            max_year_offset: default_max_year_offset(),
            pooling_mode: PoolingMode::default(),
        }
    }
}

impl RulesConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Kiểm tra các giá trị config có hợp lệ không
    pub fn validate(&self) -> CoreResult<()> {
        if self.target_intensity <= Decimal::ZERO {
            return Err(CoreError::validation("Target intensity must be positive."));
        }
        if self.energy_factor <= Decimal::ZERO {
            return Err(CoreError::validation("Energy factor must be positive."));
        }
        if self.max_year_offset < 0 {
            return Err(CoreError::validation("Max year offset cannot be negative."));
        }
        Ok(())
    }

    /// Accepted route years given the current calendar year
    pub fn year_window(&self, current_year: i32) -> RangeInclusive<i32> {
        self.min_year..=current_year + self.max_year_offset
    }
}
