//! Accounting document specs.
//!
//! The general ledger is an external collaborator: the core only describes
//! the documents it needs (sales invoices, credit notes, payments, two-line
//! transfer entries) and the document factory in the persistence layer
//! resolves products, journals, and accounts against company configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use farebox_shared::types::ContactId;

/// Document spec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// Transfer amount must be strictly positive.
    #[error("amount must be greater than 0")]
    NonPositiveTransfer,
    /// An invoice needs at least one line.
    #[error("Missing invoice lines")]
    EmptyInvoice,
}

/// Product a priced invoice line bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Platform ride commission.
    Commission,
    /// Ride fine / penalty.
    Fine,
    /// Welcome coupon service credit.
    Coupon,
    /// Loyalty points credit.
    Points,
    /// Subscription service.
    Subscription,
}

/// One priced line on an invoice or credit note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineSpec {
    /// Product to bill.
    pub product: ProductKind,
    /// Line label.
    pub label: String,
    /// Unit price (quantity is always 1).
    pub amount: Decimal,
}

impl InvoiceLineSpec {
    /// Commission line.
    #[must_use]
    pub fn commission(amount: Decimal) -> Self {
        Self {
            product: ProductKind::Commission,
            label: "Ride Commission".to_string(),
            amount,
        }
    }

    /// Fine line.
    #[must_use]
    pub fn fine(amount: Decimal) -> Self {
        Self {
            product: ProductKind::Fine,
            label: "Ride Fine".to_string(),
            amount,
        }
    }

    /// Welcome coupon credit line.
    #[must_use]
    pub fn coupon(amount: Decimal) -> Self {
        Self {
            product: ProductKind::Coupon,
            label: "Welcome Coupon - Service Credit".to_string(),
            amount,
        }
    }

    /// Loyalty points credit line.
    #[must_use]
    pub fn points(amount: Decimal) -> Self {
        Self {
            product: ProductKind::Points,
            label: "Loyalty program - points credit".to_string(),
            amount,
        }
    }
}

/// A sales invoice against a partner, posted on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSpec {
    /// Partner being invoiced.
    pub partner: ContactId,
    /// Priced lines (at least one).
    pub lines: Vec<InvoiceLineSpec>,
}

impl InvoiceSpec {
    /// Builds an invoice spec, rejecting an empty line list.
    pub fn new(partner: ContactId, lines: Vec<InvoiceLineSpec>) -> Result<Self, DocumentError> {
        if lines.is_empty() {
            return Err(DocumentError::EmptyInvoice);
        }
        Ok(Self { partner, lines })
    }

    /// Invoice total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

/// A customer credit note with a single line, posted on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNoteSpec {
    /// Partner being credited.
    pub partner: ContactId,
    /// The credited line.
    pub line: InvoiceLineSpec,
}

/// Payment direction against a bank/cash journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentDirection {
    /// Money received from the partner.
    Inbound,
    /// Money paid out to the partner.
    Outbound,
}

/// Journal sub-type a payment settles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethodType {
    /// Bank journal.
    Bank,
    /// Fund journal.
    Fund,
    /// Cash journal.
    Cash,
    /// Tele (mobile money) journal.
    Tele,
}

impl PaymentMethodType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Fund => "fund",
            Self::Cash => "cash",
            Self::Tele => "tele",
        }
    }
}

impl std::fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(Self::Bank),
            "fund" => Ok(Self::Fund),
            "cash" => Ok(Self::Cash),
            "tele" => Ok(Self::Tele),
            other => Err(format!("Unknown payment method type: {other}")),
        }
    }
}

/// A single payment record against a journal.
///
/// The signed `amount` determines direction: positive is inbound, negative
/// outbound. The stored document always carries the absolute amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSpec {
    /// Counterparty.
    pub partner: ContactId,
    /// Signed amount.
    pub amount: Decimal,
    /// Which journal sub-type to settle against.
    pub method: PaymentMethodType,
    /// Memo / reference text.
    pub reference: String,
    /// External transaction id issued by the ride platform.
    pub transaction_id: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
    /// Bank notification image URL.
    pub image_url: Option<String>,
    /// Post immediately, or leave draft for later confirmation.
    pub post_immediately: bool,
}

impl PaymentSpec {
    /// Direction derived from the amount's sign.
    #[must_use]
    pub fn direction(&self) -> PaymentDirection {
        if self.amount > Decimal::ZERO {
            PaymentDirection::Inbound
        } else {
            PaymentDirection::Outbound
        }
    }

    /// The unsigned amount stored on the document.
    #[must_use]
    pub fn absolute_amount(&self) -> Decimal {
        self.amount.abs()
    }
}

/// A balanced two-line entry moving wallet value between two parties.
///
/// Debits the receiving party's receivable account and credits the paying
/// party's receivable account; no cash or bank journal is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSpec {
    /// Party whose wallet value decreases.
    pub paying: ContactId,
    /// Party whose wallet value increases.
    pub receiving: ContactId,
    /// Transfer amount (strictly positive).
    pub amount: Decimal,
    /// Reference text on both lines.
    pub reference: String,
}

impl TransferSpec {
    /// Builds a transfer spec, rejecting non-positive amounts.
    pub fn new(
        paying: ContactId,
        receiving: ContactId,
        amount: Decimal,
        reference: String,
    ) -> Result<Self, DocumentError> {
        if amount <= Decimal::ZERO {
            return Err(DocumentError::NonPositiveTransfer);
        }
        Ok(Self {
            paying,
            receiving,
            amount,
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_requires_lines() {
        assert_eq!(
            InvoiceSpec::new(ContactId::new(), vec![]),
            Err(DocumentError::EmptyInvoice)
        );
    }

    #[test]
    fn test_invoice_total() {
        let invoice = InvoiceSpec::new(
            ContactId::new(),
            vec![
                InvoiceLineSpec::commission(dec!(10)),
                InvoiceLineSpec::fine(dec!(5)),
            ],
        )
        .unwrap();
        assert_eq!(invoice.total(), dec!(15));
    }

    #[test]
    fn test_payment_direction_from_sign() {
        let mut spec = PaymentSpec {
            partner: ContactId::new(),
            amount: dec!(40),
            method: PaymentMethodType::Cash,
            reference: String::new(),
            transaction_id: None,
            bank: None,
            account_number: None,
            image_url: None,
            post_immediately: true,
        };
        assert_eq!(spec.direction(), PaymentDirection::Inbound);
        assert_eq!(spec.absolute_amount(), dec!(40));

        spec.amount = dec!(-40);
        assert_eq!(spec.direction(), PaymentDirection::Outbound);
        assert_eq!(spec.absolute_amount(), dec!(40));
    }

    #[test]
    fn test_transfer_rejects_non_positive() {
        let err = TransferSpec::new(
            ContactId::new(),
            ContactId::new(),
            dec!(0),
            "Ride R-1 wallet transfer".to_string(),
        );
        assert_eq!(err, Err(DocumentError::NonPositiveTransfer));
    }

    #[test]
    fn test_payment_method_parse() {
        use std::str::FromStr;
        assert_eq!(
            PaymentMethodType::from_str("cash"),
            Ok(PaymentMethodType::Cash)
        );
        assert!(PaymentMethodType::from_str("points").is_err());
    }
}
