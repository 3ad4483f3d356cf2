//! Ride settlement state machine.
//!
//! - Closed payment-mode enum with one planner per variant
//! - Penalty aggregation
//! - Settlement plans (ordered ledger effects + reported deltas)
//! - Settlement errors

pub mod error;
pub mod mode;
pub mod penalty;
pub mod plan;

#[cfg(test)]
mod plan_props;

pub use error::SettlementError;
pub use mode::{PaymentMode, SettlementCase};
pub use penalty::{Penalty, PenaltyParty, PenaltyTotals, aggregate};
pub use plan::{
    DepositStep, Party, RideFacts, SettlementPlan, SettlementStep, WalletDeltas, WithdrawStep,
};
