//! # FuelEU Business
//!
//! Use-case layer: route baseline/comparison, compliance balance,
//! banking, pooling và audit history.
//!
//! Mỗi service mượn một `ServiceContext` (pool + event store + rules):
//!
//! ```rust,ignore
//! let ctx = ServiceContext::new(&db, RulesConfig::default());
//! let result = BankingService::new(&ctx).apply_banked("S1", 2025, dec!(120)).await?;
//! ```

pub mod audit;
pub mod banking;
pub mod compliance;
pub mod error;
pub mod pooling;
pub mod routes;
pub mod services;

pub use audit::AuditService;
pub use banking::BankingService;
pub use compliance::ComplianceService;
pub use error::{BusinessError, BusinessResult};
pub use pooling::PoolingService;
pub use routes::RouteService;
pub use services::{AdjustedCb, ApplyBankedResult, BankBalance, PoolResult, ServiceContext};
