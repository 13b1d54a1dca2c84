//! Policy guards consulted before mutating calls

pub mod duplicates;
pub mod purchase_orders;

pub use duplicates::DuplicateDetector;
pub use purchase_orders::PoResolver;
