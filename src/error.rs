//! Error types for the billing system.

use thiserror::Error;

/// Result type alias for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;

/// Errors that can occur while managing customer records.
#[derive(Error, Debug)]
pub enum BillingError {
    /// No customer with the given ID exists
    #[error("Customer not found with ID: {id}")]
    NotFound { id: i32 },

    /// Payment requested for a bill that is already settled
    #[error("Bill for customer {id} is already paid")]
    AlreadyPaid { id: i32 },

    /// Failed to open, read or write a data file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export error
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// Data file could not be decoded
    #[error("Corrupt data at byte {offset}: {message}")]
    Corrupt { offset: usize, message: String },
}
