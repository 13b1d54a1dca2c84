//! Error types for the ledger client

use ledger_types::Bill;
use thiserror::Error;

/// Main error type for all ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// The gateway answered with a non-success status. Carries the parsed
    /// (or synthesized) error body so callers can inspect what the server
    /// actually said.
    #[error("Gateway returned {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: serde_json::Value,
    },

    #[error("Bill input names no vendor")]
    MissingVendor,

    #[error("No posting pattern on file for vendor {vendor_id}")]
    NoVendorPattern { vendor_id: String },

    /// A recently updated bill already carries this reference number. The
    /// existing bill rides along so callers can show what was matched.
    #[error("A bill with reference number {ref_number} already exists")]
    DuplicateBill {
        ref_number: String,
        existing: Box<Bill>,
    },

    #[error("Audit log write failed: {0}")]
    Audit(String),
}

impl LedgerError {
    /// Machine-readable code an automated caller can branch on without
    /// parsing the display message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "HttpError",
            Self::Json(_) => "JsonError",
            Self::Config(_) => "ConfigurationError",
            Self::Io(_) => "IoError",
            Self::Api { .. } => "ApiError",
            Self::MissingVendor => "MISSING_VENDOR",
            Self::NoVendorPattern { .. } => "NO_VENDOR_PATTERN",
            Self::DuplicateBill { .. } => "DUPLICATE_BILL",
            Self::Audit(_) => "AuditError",
        }
    }
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
