//! Wallet ledger domain.
//!
//! - Ledger entries (append-only wallet movements)
//! - Balance calculation (posted entries only)
//! - Operation planning for the withdraw/deposit primitives
//! - Wallet errors

pub mod balance;
pub mod entry;
pub mod error;
pub mod operations;

#[cfg(test)]
mod balance_props;

pub use balance::{BalanceBreakdown, posted_balance, posted_breakdown};
pub use entry::{DepositMethod, DocumentRef, EntryStatus, LedgerEntry};
pub use error::WalletError;
pub use operations::{
    DepositRequest, EntryTemplate, PlannedDocument, WalletEffect, WithdrawRequest,
    ensure_balance_covers, plan_deposit, plan_withdraw, projected_balance_after,
};
