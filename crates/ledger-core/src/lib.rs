//! Ledger Core Library
//!
//! Policy-enforcing client for QuickBooks Desktop data behind the Conductor
//! gateway: authenticated transport, cursor pagination, pre-write guards
//! (vendor posting patterns, duplicate detection, active purchase orders)
//! and an append-only audit log of every mutation.

pub mod audit;
pub mod clients;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod guards;
pub mod ledger;
pub mod patterns;

// Re-export main types for easy access
pub use config::{ConductorConfig, LedgerConfig};
pub use error::{LedgerError, Result};

pub use audit::AuditLog;
pub use clients::ConductorClient;
pub use guards::{DuplicateDetector, PoResolver};
pub use ledger::{CreateBillOptions, LedgerClient};
pub use patterns::PatternStore;
