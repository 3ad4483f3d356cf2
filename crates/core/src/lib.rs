//! Core business logic for Farebox.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and the settlement
//! planner live here.
//!
//! # Modules
//!
//! - `wallet` - Wallet ledger entries, balance calculation, operation planning
//! - `documents` - Accounting document specs (invoices, payments, transfers)
//! - `settlement` - Ride settlement state machine
//! - `contact` - Contact (rider/driver) domain types and validation
//! - `subscription` - Subscription types and wallet balance guard

pub mod contact;
pub mod documents;
pub mod settlement;
pub mod subscription;
pub mod wallet;
