//! # FuelEU Core
//!
//! Domain types và thuật toán thuần cho GHG compliance của đội tàu:
//! - `Route`: voyage record với GHG intensity, fuel, distance, baseline flag
//! - `ComplianceBalance`: CB = (target - actual) × energy, làm tròn 6 chữ số
//! - `compare_routes`: % chênh lệch intensity so với baseline route
//! - `BankEntry` + `plan_withdrawal`: banking ledger, rút FIFO theo năm
//! - `allocate_pool`: phân bổ surplus sang deficit trong một pool
//!
//! Không có I/O ở crate này; persistence và use cases nằm ở các crate khác.

pub mod amount;
pub mod bank;
pub mod comparison;
pub mod compliance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod pool;
pub mod route;

pub use amount::{checked_product, checked_sum, checked_total};
pub use bank::{banked_balance, plan_withdrawal, validate_deposit, BankEntry, NewBankEntry, WithdrawalPlan};
pub use comparison::{compare_routes, ComparisonReport, ComparisonRow};
pub use compliance::{
    compute_compliance_balance, latest_per_ship, CbStatus, ComplianceBalance, ComplianceRecord,
    NewComplianceRecord,
};
pub use config::{PoolingMode, RulesConfig};
pub use constants::{ENERGY_FACTOR, GRAMS_PER_TONNE, TARGET_INTENSITY};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use event::{format_event_id, ComplianceEvent, EventType};
pub use pool::{allocate_pool, Pool, PoolAllocation, PoolMember, PoolMemberInput};
pub use route::Route;
