//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Ledger mutations execute inside database transactions
//! holding the affected wallet (and ride) row locks.

pub mod api_key;
pub mod company;
pub mod contact;
pub mod document;
pub mod ride;
pub mod subscription;
pub mod wallet;

pub use api_key::ApiKeyRepository;
pub use company::{CompanyError, CompanyRepository};
pub use contact::{
    ContactChanges, ContactIdentifier, ContactRepoError, ContactRepository, RegisteredContact,
};
pub use document::{DocumentError, DocumentRepository};
pub use ride::{RideError, RideRepository, SettleRideInput, SettlementOutcome};
pub use subscription::{SubscriptionOutcome, SubscriptionRepoError, SubscriptionRepository};
pub use wallet::{
    AddWalletTransactionInput, ConfirmTransactionInput, ConfirmTransactionOutcome, TopUpMethod,
    WalletError, WalletOperationOutcome, WalletRepository, WalletWithdrawInput,
    WithdrawTransactionOutcome,
};
