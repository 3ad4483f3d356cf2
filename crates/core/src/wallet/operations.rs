//! Wallet ledger operation planning.
//!
//! `withdraw` and `deposit` are the only way ledger entries are created;
//! every higher-level flow composes them. This module plans the effect of
//! one operation (which accounting document to create, what entry to
//! append) while the persistence layer executes the plan under the wallet
//! row lock and writes back the recomputed posted balance.

use rust_decimal::Decimal;

use farebox_shared::types::ContactId;

use super::entry::{DepositMethod, DocumentRef, EntryStatus};
use super::error::WalletError;
use crate::documents::{InvoiceLineSpec, InvoiceSpec, PaymentMethodType, PaymentSpec};

/// A withdraw operation to plan.
#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    /// Amount to debit from the wallet.
    pub amount: Decimal,
    /// Commission component to invoice.
    pub commission_amount: Decimal,
    /// Fine component to invoice.
    pub fine_amount: Decimal,
    /// Entry description.
    pub description: String,
    /// Status of the appended entry.
    pub status: EntryStatus,
    /// Contact the invoice (or fallback reference) points at.
    pub payer: ContactId,
    /// Whether to build a commission/fine invoice.
    pub create_invoice: bool,
    /// Reference used when no invoice is created.
    pub fallback_document: DocumentRef,
}

/// A deposit operation to plan.
#[derive(Debug, Clone)]
pub struct DepositRequest {
    /// Amount to credit to the wallet (sign drives payment direction).
    pub amount: Decimal,
    /// Entry description.
    pub description: String,
    /// Status of the appended entry.
    pub status: EntryStatus,
    /// Counterparty of the payment (or fallback reference).
    pub payer: ContactId,
    /// Whether to create a backing cash payment record.
    pub create_payment: bool,
    /// Reference used when no payment is created.
    pub fallback_document: DocumentRef,
    /// How the funds arrived.
    pub deposit_method: DepositMethod,
    /// External reference.
    pub reference: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
}

impl DepositRequest {
    /// A direct cash-style deposit.
    #[must_use]
    pub fn direct(
        amount: Decimal,
        description: String,
        payer: ContactId,
        create_payment: bool,
    ) -> Self {
        Self {
            amount,
            description,
            status: EntryStatus::Posted,
            payer,
            create_payment,
            fallback_document: DocumentRef::Contact(payer),
            deposit_method: DepositMethod::Direct,
            reference: None,
            bank: None,
            account_number: None,
        }
    }
}

/// Document the executor must create (and post) before appending the entry.
#[derive(Debug, Clone)]
pub enum PlannedDocument {
    /// No backing document.
    None,
    /// Post a commission/fine invoice.
    Invoice(InvoiceSpec),
    /// Create a payment record.
    Payment(PaymentSpec),
}

/// Template for the ledger entry the executor appends.
///
/// The document reference is filled in by the executor once the planned
/// document exists; when no document is planned the fallback is used.
#[derive(Debug, Clone)]
pub struct EntryTemplate {
    /// Signed credit amount.
    pub issued: Decimal,
    /// Legacy debit amount.
    pub used: Decimal,
    /// Draft or posted.
    pub status: EntryStatus,
    /// Description.
    pub description: String,
    /// Deposit metadata.
    pub deposit_method: DepositMethod,
    /// External reference.
    pub reference: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
    /// Reference used when no document is created.
    pub fallback_document: DocumentRef,
}

/// The planned effect of one wallet operation.
#[derive(Debug, Clone)]
pub struct WalletEffect {
    /// Document to create first.
    pub document: PlannedDocument,
    /// Entry to append.
    pub entry: EntryTemplate,
}

/// Plans a withdraw: optional commission/fine invoice plus a debit entry.
///
/// The invoice carries a commission line whenever invoicing (including a
/// zero commission) and a fine line only when the fine is positive.
pub fn plan_withdraw(request: &WithdrawRequest) -> Result<WalletEffect, WalletError> {
    let should_invoice = request.create_invoice
        && (request.commission_amount >= Decimal::ZERO || request.fine_amount > Decimal::ZERO);

    let document = if should_invoice {
        let mut lines = Vec::new();
        if request.commission_amount >= Decimal::ZERO {
            lines.push(InvoiceLineSpec::commission(request.commission_amount));
        }
        if request.fine_amount > Decimal::ZERO {
            lines.push(InvoiceLineSpec::fine(request.fine_amount));
        }
        PlannedDocument::Invoice(InvoiceSpec::new(request.payer, lines)?)
    } else {
        PlannedDocument::None
    };

    Ok(WalletEffect {
        document,
        entry: EntryTemplate {
            issued: -request.amount,
            used: Decimal::ZERO,
            status: request.status,
            description: request.description.clone(),
            deposit_method: DepositMethod::Direct,
            reference: None,
            bank: None,
            account_number: None,
            fallback_document: request.fallback_document,
        },
    })
}

/// Plans a deposit: optional cash payment record plus a credit entry.
pub fn plan_deposit(request: &DepositRequest) -> Result<WalletEffect, WalletError> {
    let document = if request.create_payment {
        PlannedDocument::Payment(PaymentSpec {
            partner: request.payer,
            amount: request.amount,
            method: PaymentMethodType::Cash,
            reference: request.description.clone(),
            transaction_id: None,
            bank: None,
            account_number: None,
            image_url: None,
            post_immediately: true,
        })
    } else {
        PlannedDocument::None
    };

    Ok(WalletEffect {
        document,
        entry: EntryTemplate {
            issued: request.amount,
            used: Decimal::ZERO,
            status: request.status,
            description: request.description.clone(),
            deposit_method: request.deposit_method,
            reference: request.reference.clone(),
            bank: request.bank.clone(),
            account_number: request.account_number.clone(),
            fallback_document: request.fallback_document,
        },
    })
}

/// Rejects a withdrawal that the posted balance does not cover.
///
/// Runs before any accounting document is created so a rejection has zero
/// side effects.
pub fn ensure_balance_covers(available: Decimal, requested: Decimal) -> Result<(), WalletError> {
    if requested > available {
        return Err(WalletError::InsufficientBalance {
            available,
            requested,
        });
    }
    Ok(())
}

/// Balance figure reported to the caller for a draft withdrawal.
///
/// Draft entries never move the persisted balance; this projection is
/// response-only.
#[must_use]
pub fn projected_balance_after(balance: Decimal, amount: Decimal) -> Decimal {
    balance - amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::ProductKind;
    use rust_decimal_macros::dec;

    fn withdraw_request(commission: Decimal, fine: Decimal, invoice: bool) -> WithdrawRequest {
        let payer = ContactId::new();
        WithdrawRequest {
            amount: commission + fine,
            commission_amount: commission,
            fine_amount: fine,
            description: "Ride commission R-1 (cash)".to_string(),
            status: EntryStatus::Posted,
            payer,
            create_invoice: invoice,
            fallback_document: DocumentRef::Contact(payer),
        }
    }

    #[test]
    fn test_withdraw_invoice_has_commission_and_fine_lines() {
        let effect = plan_withdraw(&withdraw_request(dec!(10), dec!(5), true)).unwrap();
        let PlannedDocument::Invoice(invoice) = effect.document else {
            panic!("expected invoice");
        };
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[0].product, ProductKind::Commission);
        assert_eq!(invoice.lines[0].amount, dec!(10));
        assert_eq!(invoice.lines[1].product, ProductKind::Fine);
        assert_eq!(invoice.lines[1].amount, dec!(5));
        assert_eq!(effect.entry.issued, dec!(-15));
        assert_eq!(effect.entry.used, Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_zero_commission_still_invoiced() {
        let effect = plan_withdraw(&withdraw_request(dec!(0), dec!(5), true)).unwrap();
        let PlannedDocument::Invoice(invoice) = effect.document else {
            panic!("expected invoice");
        };
        assert_eq!(invoice.lines.len(), 2);
        assert_eq!(invoice.lines[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_withdraw_no_fine_line_when_zero() {
        let effect = plan_withdraw(&withdraw_request(dec!(10), dec!(0), true)).unwrap();
        let PlannedDocument::Invoice(invoice) = effect.document else {
            panic!("expected invoice");
        };
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].product, ProductKind::Commission);
    }

    #[test]
    fn test_withdraw_without_invoice() {
        let effect = plan_withdraw(&withdraw_request(dec!(10), dec!(5), false)).unwrap();
        assert!(matches!(effect.document, PlannedDocument::None));
    }

    #[test]
    fn test_deposit_payment_direction_follows_sign() {
        let request = DepositRequest::direct(
            dec!(-25),
            "Ride payment R-1 (wallet)".to_string(),
            ContactId::new(),
            true,
        );
        let effect = plan_deposit(&request).unwrap();
        let PlannedDocument::Payment(payment) = effect.document else {
            panic!("expected payment");
        };
        assert_eq!(payment.amount, dec!(-25));
        assert_eq!(payment.absolute_amount(), dec!(25));
        assert_eq!(effect.entry.issued, dec!(-25));
    }

    #[test]
    fn test_deposit_without_payment_uses_fallback() {
        let request = DepositRequest::direct(dec!(25), String::new(), ContactId::new(), false);
        let effect = plan_deposit(&request).unwrap();
        assert!(matches!(effect.document, PlannedDocument::None));
        assert!(matches!(
            effect.entry.fallback_document,
            DocumentRef::Contact(_)
        ));
    }

    #[test]
    fn test_balance_guard() {
        assert!(ensure_balance_covers(dec!(100), dec!(100)).is_ok());
        assert!(ensure_balance_covers(dec!(100), dec!(99.99)).is_ok());
        assert_eq!(
            ensure_balance_covers(dec!(100), dec!(100.01)),
            Err(WalletError::InsufficientBalance {
                available: dec!(100),
                requested: dec!(100.01),
            })
        );
    }

    #[test]
    fn test_projected_balance() {
        assert_eq!(projected_balance_after(dec!(80), dec!(30)), dec!(50));
    }
}
