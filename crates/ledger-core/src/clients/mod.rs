//! Gateway transport: the authenticated request core and the cursor paginator

pub mod conductor;
pub mod pagination;

// Re-export the client type
pub use conductor::ConductorClient;
