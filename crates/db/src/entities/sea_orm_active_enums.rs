//! `SeaORM` active enums mirroring the database enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ledger entry status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
pub enum EntryStatus {
    /// Pending confirmation.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Confirmed-effective.
    #[sea_orm(string_value = "posted")]
    Posted,
}

/// How a deposit reached the wallet.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deposit_method")]
pub enum DepositMethod {
    /// Settled immediately.
    #[sea_orm(string_value = "direct")]
    Direct,
    /// Awaiting bank confirmation.
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
}

/// Tag of the polymorphic document reference on a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_ref_kind")]
pub enum OrderRefKind {
    /// Payment document.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Invoice or credit note.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Two-line transfer entry.
    #[sea_orm(string_value = "transfer_entry")]
    TransferEntry,
    /// Subscription record.
    #[sea_orm(string_value = "subscription")]
    Subscription,
    /// Bare contact (no document created).
    #[sea_orm(string_value = "contact")]
    Contact,
    /// No reference at all.
    #[sea_orm(string_value = "none")]
    None,
}

/// Contact type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contact_type")]
pub enum ContactType {
    /// Platform driver.
    #[sea_orm(string_value = "driver")]
    Driver,
    /// Platform rider.
    #[sea_orm(string_value = "rider")]
    Rider,
}

/// Contact gender.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gender")]
pub enum Gender {
    /// Male.
    #[sea_orm(string_value = "male")]
    Male,
    /// Female.
    #[sea_orm(string_value = "female")]
    Female,
}

/// Ride settlement state.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "ride_state")]
pub enum RideState {
    /// Awaiting settlement.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Settled (terminal).
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Ride payment mode.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
pub enum PaymentMode {
    /// Fare fully in cash.
    #[sea_orm(string_value = "cash_only")]
    CashOnly,
    /// Cash exceeds the fare.
    #[sea_orm(string_value = "cash_exceed")]
    CashExceed,
    /// Fare fully from wallet.
    #[sea_orm(string_value = "wallet_paid")]
    WalletPaid,
    /// Wallet plus cash.
    #[sea_orm(string_value = "wallet_cash")]
    WalletCash,
}

/// Accounting document kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_kind")]
pub enum DocumentKind {
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Customer credit note.
    #[sea_orm(string_value = "credit_note")]
    CreditNote,
    /// Payment record.
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Two-line transfer entry.
    #[sea_orm(string_value = "transfer_entry")]
    TransferEntry,
}

/// Accounting document state.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_state")]
pub enum DocumentState {
    /// Not yet effective.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Effective.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Declined / voided.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payment direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_direction")]
pub enum PaymentDirection {
    /// Money received.
    #[sea_orm(string_value = "inbound")]
    Inbound,
    /// Money paid out.
    #[sea_orm(string_value = "outbound")]
    Outbound,
}

/// Journal type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_type")]
pub enum JournalType {
    /// General journal.
    #[sea_orm(string_value = "general")]
    General,
    /// Sales journal.
    #[sea_orm(string_value = "sale")]
    Sale,
}

/// Journal sub-type used to pick a payment journal.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_sub_type")]
pub enum JournalSubType {
    /// Bank journal.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Fund journal.
    #[sea_orm(string_value = "fund")]
    Fund,
    /// Cash journal.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Tele (mobile money) journal.
    #[sea_orm(string_value = "tele")]
    Tele,
}

/// Account type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    /// Bank & cash asset.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Receivable asset.
    #[sea_orm(string_value = "receivable")]
    Receivable,
    /// Current liability (wallet balances).
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Expense.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Revenue.
    #[sea_orm(string_value = "revenue")]
    Revenue,
}

/// Product kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_kind")]
pub enum ProductKind {
    /// Ride commission.
    #[sea_orm(string_value = "commission")]
    Commission,
    /// Ride fine.
    #[sea_orm(string_value = "fine")]
    Fine,
    /// Welcome coupon.
    #[sea_orm(string_value = "coupon")]
    Coupon,
    /// Loyalty points.
    #[sea_orm(string_value = "points")]
    Points,
    /// Subscription service.
    #[sea_orm(string_value = "subscription")]
    Subscription,
}

/// Subscription plan type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_type")]
pub enum SubscriptionType {
    /// Private car plan.
    #[sea_orm(string_value = "private")]
    Private,
    /// Pinky plan.
    #[sea_orm(string_value = "pinky")]
    Pinky,
    /// VIP plan.
    #[sea_orm(string_value = "vip")]
    Vip,
    /// Van plan.
    #[sea_orm(string_value = "van")]
    Van,
    /// Taxi plan.
    #[sea_orm(string_value = "taxi")]
    Taxi,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<farebox_core::wallet::EntryStatus> for EntryStatus {
    fn from(status: farebox_core::wallet::EntryStatus) -> Self {
        match status {
            farebox_core::wallet::EntryStatus::Draft => Self::Draft,
            farebox_core::wallet::EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<EntryStatus> for farebox_core::wallet::EntryStatus {
    fn from(status: EntryStatus) -> Self {
        match status {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
        }
    }
}

impl From<farebox_core::wallet::DepositMethod> for DepositMethod {
    fn from(method: farebox_core::wallet::DepositMethod) -> Self {
        match method {
            farebox_core::wallet::DepositMethod::Direct => Self::Direct,
            farebox_core::wallet::DepositMethod::BankTransfer => Self::BankTransfer,
        }
    }
}

impl From<DepositMethod> for farebox_core::wallet::DepositMethod {
    fn from(method: DepositMethod) -> Self {
        match method {
            DepositMethod::Direct => Self::Direct,
            DepositMethod::BankTransfer => Self::BankTransfer,
        }
    }
}

impl From<farebox_core::contact::ContactType> for ContactType {
    fn from(contact_type: farebox_core::contact::ContactType) -> Self {
        match contact_type {
            farebox_core::contact::ContactType::Driver => Self::Driver,
            farebox_core::contact::ContactType::Rider => Self::Rider,
        }
    }
}

impl From<ContactType> for farebox_core::contact::ContactType {
    fn from(contact_type: ContactType) -> Self {
        match contact_type {
            ContactType::Driver => Self::Driver,
            ContactType::Rider => Self::Rider,
        }
    }
}

impl From<farebox_core::contact::Gender> for Gender {
    fn from(gender: farebox_core::contact::Gender) -> Self {
        match gender {
            farebox_core::contact::Gender::Male => Self::Male,
            farebox_core::contact::Gender::Female => Self::Female,
        }
    }
}

impl From<Gender> for farebox_core::contact::Gender {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => Self::Male,
            Gender::Female => Self::Female,
        }
    }
}

impl From<farebox_core::settlement::PaymentMode> for PaymentMode {
    fn from(mode: farebox_core::settlement::PaymentMode) -> Self {
        match mode {
            farebox_core::settlement::PaymentMode::CashOnly => Self::CashOnly,
            farebox_core::settlement::PaymentMode::CashExceed => Self::CashExceed,
            farebox_core::settlement::PaymentMode::WalletPaid => Self::WalletPaid,
            farebox_core::settlement::PaymentMode::WalletCash => Self::WalletCash,
        }
    }
}

impl From<farebox_core::documents::PaymentDirection> for PaymentDirection {
    fn from(direction: farebox_core::documents::PaymentDirection) -> Self {
        match direction {
            farebox_core::documents::PaymentDirection::Inbound => Self::Inbound,
            farebox_core::documents::PaymentDirection::Outbound => Self::Outbound,
        }
    }
}

impl From<farebox_core::documents::PaymentMethodType> for JournalSubType {
    fn from(method: farebox_core::documents::PaymentMethodType) -> Self {
        match method {
            farebox_core::documents::PaymentMethodType::Bank => Self::Bank,
            farebox_core::documents::PaymentMethodType::Fund => Self::Fund,
            farebox_core::documents::PaymentMethodType::Cash => Self::Cash,
            farebox_core::documents::PaymentMethodType::Tele => Self::Tele,
        }
    }
}

impl From<farebox_core::documents::ProductKind> for ProductKind {
    fn from(kind: farebox_core::documents::ProductKind) -> Self {
        match kind {
            farebox_core::documents::ProductKind::Commission => Self::Commission,
            farebox_core::documents::ProductKind::Fine => Self::Fine,
            farebox_core::documents::ProductKind::Coupon => Self::Coupon,
            farebox_core::documents::ProductKind::Points => Self::Points,
            farebox_core::documents::ProductKind::Subscription => Self::Subscription,
        }
    }
}

impl From<farebox_core::subscription::SubscriptionType> for SubscriptionType {
    fn from(subscription_type: farebox_core::subscription::SubscriptionType) -> Self {
        match subscription_type {
            farebox_core::subscription::SubscriptionType::Private => Self::Private,
            farebox_core::subscription::SubscriptionType::Pinky => Self::Pinky,
            farebox_core::subscription::SubscriptionType::Vip => Self::Vip,
            farebox_core::subscription::SubscriptionType::Van => Self::Van,
            farebox_core::subscription::SubscriptionType::Taxi => Self::Taxi,
            farebox_core::subscription::SubscriptionType::Other => Self::Other,
        }
    }
}
