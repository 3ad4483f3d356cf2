//! Wallet operation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::documents::DocumentError;

/// Errors raised while planning or guarding wallet operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    /// Posted balance does not cover the requested amount.
    #[error("Insufficient wallet balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Current posted balance.
        available: Decimal,
        /// Amount the caller asked to withdraw.
        requested: Decimal,
    },

    /// Invalid document spec.
    #[error(transparent)]
    Document(#[from] DocumentError),
}
