//! Wallet balance calculation.
//!
//! The cached balance on a wallet is a denormalized projection; this module
//! is the authoritative derivation: `Σ issued(posted) − Σ used(posted)`.
//! It must be re-derivable at any time and is the only value ever written
//! back to the wallet record.

use rust_decimal::Decimal;

use super::entry::LedgerEntry;

/// Issued/used totals over a wallet's posted history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceBreakdown {
    /// Sum of `issued` over posted entries.
    pub issued_total: Decimal,
    /// Sum of `used` over posted entries.
    pub used_total: Decimal,
}

impl BalanceBreakdown {
    /// The derived balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.issued_total - self.used_total
    }
}

/// Derives the issued/used totals from posted entries only.
///
/// Draft entries are skipped entirely; an empty history yields zero.
#[must_use]
pub fn posted_breakdown<'a, I>(entries: I) -> BalanceBreakdown
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut issued_total = Decimal::ZERO;
    let mut used_total = Decimal::ZERO;
    for entry in entries {
        if entry.status.counts_toward_balance() {
            issued_total += entry.issued;
            used_total += entry.used;
        }
    }
    BalanceBreakdown {
        issued_total,
        used_total,
    }
}

/// Derives the wallet balance from posted entries only.
#[must_use]
pub fn posted_balance<'a, I>(entries: I) -> Decimal
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    posted_breakdown(entries).balance()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::entry::{DepositMethod, DocumentRef, EntryStatus};
    use farebox_shared::types::{LedgerEntryId, WalletId};
    use rust_decimal_macros::dec;

    fn entry(issued: Decimal, used: Decimal, status: EntryStatus) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            wallet_id: WalletId::new(),
            issued,
            used,
            status,
            description: String::new(),
            document: DocumentRef::None,
            deposit_method: DepositMethod::Direct,
            reference: None,
            bank: None,
            account_number: None,
        }
    }

    #[test]
    fn test_empty_history_yields_zero() {
        assert_eq!(posted_balance([].iter()), Decimal::ZERO);
    }

    #[test]
    fn test_balance_sums_issued_minus_used() {
        let entries = vec![
            entry(dec!(100), dec!(0), EntryStatus::Posted),
            entry(dec!(-25), dec!(0), EntryStatus::Posted),
            entry(dec!(0), dec!(10), EntryStatus::Posted),
        ];
        assert_eq!(posted_balance(&entries), dec!(65));
    }

    #[test]
    fn test_draft_entries_are_excluded() {
        let entries = vec![
            entry(dec!(100), dec!(0), EntryStatus::Posted),
            entry(dec!(-40), dec!(0), EntryStatus::Draft),
            entry(dec!(0), dec!(999), EntryStatus::Draft),
        ];
        assert_eq!(posted_balance(&entries), dec!(100));
    }

    #[test]
    fn test_breakdown_totals() {
        let entries = vec![
            entry(dec!(50), dec!(0), EntryStatus::Posted),
            entry(dec!(30), dec!(20), EntryStatus::Posted),
        ];
        let breakdown = posted_breakdown(&entries);
        assert_eq!(breakdown.issued_total, dec!(80));
        assert_eq!(breakdown.used_total, dec!(20));
        assert_eq!(breakdown.balance(), dec!(60));
    }
}
