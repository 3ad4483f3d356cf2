//! Wallet ledger entry domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use farebox_shared::types::{ContactId, DocumentId, LedgerEntryId, SubscriptionId, WalletId};

/// Status of a ledger entry.
///
/// Only `Posted` entries count toward the wallet balance. `Draft` entries
/// exist for asynchronous flows (bank-transfer confirmation) and become
/// effective when the backing accounting document is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Pending confirmation; excluded from the balance.
    Draft,
    /// Confirmed-effective; included in the balance.
    Posted,
}

impl EntryStatus {
    /// Returns true if entries in this status count toward the balance.
    #[must_use]
    pub fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// How a deposit reached the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositMethod {
    /// Settled immediately (cash, card).
    Direct,
    /// Awaiting bank confirmation.
    BankTransfer,
}

/// Reference to the accounting document that justifies a ledger entry.
///
/// A tagged union instead of a stringly-typed (model, id) pair: invalid tag
/// states are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentRef {
    /// Backed by a payment record.
    Payment(DocumentId),
    /// Backed by a sales invoice or credit note.
    Invoice(DocumentId),
    /// Backed by a two-line wallet transfer entry.
    TransferEntry(DocumentId),
    /// Wallet-paid subscription; points at the subscription record.
    Subscription(SubscriptionId),
    /// No document was created; points at the counterparty contact.
    Contact(ContactId),
    /// No justifying record at all.
    None,
}

impl DocumentRef {
    /// Returns the referenced accounting document id, if any.
    #[must_use]
    pub fn document_id(self) -> Option<DocumentId> {
        match self {
            Self::Payment(id) | Self::Invoice(id) | Self::TransferEntry(id) => Some(id),
            Self::Subscription(_) | Self::Contact(_) | Self::None => None,
        }
    }
}

/// One append-only wallet movement record.
///
/// `issued` is the signed credit amount (negative represents a debit);
/// `used` is the legacy debit field. Both participate in the balance:
/// `balance = Σ issued(posted) − Σ used(posted)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The wallet this entry belongs to.
    pub wallet_id: WalletId,
    /// Signed credit amount.
    pub issued: Decimal,
    /// Legacy debit amount.
    pub used: Decimal,
    /// Draft or posted.
    pub status: EntryStatus,
    /// Human-readable description.
    pub description: String,
    /// The accounting document justifying this movement.
    pub document: DocumentRef,
    /// How the funds arrived (deposits).
    pub deposit_method: DepositMethod,
    /// External reference (deposits).
    pub reference: Option<String>,
    /// Bank name (bank transfers).
    pub bank: Option<String>,
    /// Customer bank account number (bank transfers).
    pub account_number: Option<String>,
}

impl LedgerEntry {
    /// Net effect of this entry on the balance once posted.
    #[must_use]
    pub fn net_amount(&self) -> Decimal {
        self.issued - self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_posted_counts() {
        assert!(EntryStatus::Posted.counts_toward_balance());
        assert!(!EntryStatus::Draft.counts_toward_balance());
    }

    #[test]
    fn test_document_ref_ids() {
        let id = DocumentId::new();
        assert_eq!(DocumentRef::Payment(id).document_id(), Some(id));
        assert_eq!(DocumentRef::Invoice(id).document_id(), Some(id));
        assert_eq!(DocumentRef::TransferEntry(id).document_id(), Some(id));
        assert_eq!(DocumentRef::Contact(ContactId::new()).document_id(), None);
        assert_eq!(
            DocumentRef::Subscription(SubscriptionId::new()).document_id(),
            None
        );
        assert_eq!(DocumentRef::None.document_id(), None);
    }

    #[test]
    fn test_net_amount_combines_issued_and_used() {
        let entry = LedgerEntry {
            id: LedgerEntryId::new(),
            wallet_id: WalletId::new(),
            issued: dec!(-30),
            used: dec!(20),
            status: EntryStatus::Posted,
            description: String::new(),
            document: DocumentRef::None,
            deposit_method: DepositMethod::Direct,
            reference: None,
            bank: None,
            account_number: None,
        };
        assert_eq!(entry.net_amount(), dec!(-50));
    }
}
