//! Property-based tests for the balance calculator.
//!
//! - Balance equals Σ issued(posted) − Σ used(posted) for any history
//! - Draft entries never affect the balance
//! - The calculation is order-independent

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::posted_balance;
use super::entry::{DepositMethod, DocumentRef, EntryStatus, LedgerEntry};
use farebox_shared::types::{LedgerEntryId, WalletId};

/// Strategy for signed amounts in cents (−10,000.00 to 10,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for non-negative used amounts in cents.
fn used_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![Just(EntryStatus::Draft), Just(EntryStatus::Posted)]
}

fn entry_strategy() -> impl Strategy<Value = LedgerEntry> {
    (signed_amount(), used_amount(), status_strategy()).prop_map(|(issued, used, status)| {
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
    })
}

proptest! {
    #[test]
    fn balance_matches_posted_sums(entries in prop::collection::vec(entry_strategy(), 0..50)) {
        let expected: Decimal = entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted)
            .map(|e| e.issued - e.used)
            .sum();
        prop_assert_eq!(posted_balance(&entries), expected);
    }

    #[test]
    fn draft_entries_never_move_balance(
        entries in prop::collection::vec(entry_strategy(), 0..30),
        drafts in prop::collection::vec((signed_amount(), used_amount()), 0..30),
    ) {
        let before = posted_balance(&entries);
        let mut with_drafts = entries;
        for (issued, used) in drafts {
            with_drafts.push(LedgerEntry {
                id: LedgerEntryId::new(),
                wallet_id: WalletId::new(),
                issued,
                used,
                status: EntryStatus::Draft,
                description: String::new(),
                document: DocumentRef::None,
                deposit_method: DepositMethod::BankTransfer,
                reference: None,
                bank: None,
                account_number: None,
            });
        }
        prop_assert_eq!(posted_balance(&with_drafts), before);
    }

    #[test]
    fn balance_is_order_independent(entries in prop::collection::vec(entry_strategy(), 0..30)) {
        let forward = posted_balance(&entries);
        let mut reversed = entries;
        reversed.reverse();
        prop_assert_eq!(posted_balance(&reversed), forward);
    }
}
