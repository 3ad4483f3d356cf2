//! Settlement errors.

use thiserror::Error;

/// Errors raised by the ride settlement state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// Unknown payment mode value.
    #[error("Invalid payment_mode: {0}")]
    InvalidMode(String),

    /// The ride has already been settled; settlement is terminal.
    #[error("Ride already paid")]
    AlreadyPaid,
}
