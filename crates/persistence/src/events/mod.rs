//! Audit trail module
//!
//! Ghi và đọc compliance events từ JSONL files.

pub mod reader;
pub mod store;

pub use reader::{EventFilter, EventReader};
pub use store::EventStore;
