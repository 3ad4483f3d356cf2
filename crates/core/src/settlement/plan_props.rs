//! Property-based tests for the settlement planner.
//!
//! - Delta formulas per mode
//! - Deltas conserve commission (rider + driver = −commission, except
//!   cash_exceed which also moves the cash excess)
//! - Exactly one invoiced commission withdrawal per plan
//! - Rider wallet legs are balance-guarded, commission steps are not

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::mode::PaymentMode;
use super::penalty::PenaltyTotals;
use super::plan::{Party, RideFacts, SettlementPlan, SettlementStep};

/// Amounts in cents (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strictly positive amounts.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn mode_strategy() -> impl Strategy<Value = PaymentMode> {
    prop_oneof![
        Just(PaymentMode::CashOnly),
        Just(PaymentMode::CashExceed),
        Just(PaymentMode::WalletPaid),
        Just(PaymentMode::WalletCash),
    ]
}

fn facts_strategy() -> impl Strategy<Value = RideFacts> {
    (
        positive_amount(),
        amount(),
        amount(),
        amount(),
        mode_strategy(),
        amount(),
        amount(),
    )
        .prop_map(
            |(fare, wallet, cash, commission, mode, dp, rp)| RideFacts {
                ride_ref: "R-1".to_string(),
                fare_amount: fare,
                wallet_paid: wallet,
                cash_paid: cash,
                commission_amount: commission,
                mode,
                penalties: PenaltyTotals {
                    driver: dp,
                    rider: rp,
                },
            },
        )
}

fn commission_withdrawals(plan: &SettlementPlan) -> Vec<&super::plan::WithdrawStep> {
    plan.steps
        .iter()
        .filter_map(|s| match s {
            SettlementStep::Withdraw(w) if w.party == Party::Driver && w.with_invoice => Some(w),
            _ => None,
        })
        .collect()
}

proptest! {
    #[test]
    fn delta_formulas_hold(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        let (rider, driver) = match facts.mode {
            PaymentMode::CashOnly => (Decimal::ZERO, -facts.commission_amount),
            PaymentMode::CashExceed => (
                facts.cash_paid - facts.fare_amount,
                -facts.commission_amount,
            ),
            PaymentMode::WalletPaid => (
                -facts.fare_amount,
                facts.fare_amount - facts.commission_amount,
            ),
            PaymentMode::WalletCash => (
                -facts.wallet_paid,
                facts.wallet_paid - facts.commission_amount,
            ),
        };
        prop_assert_eq!(plan.deltas.rider, rider);
        prop_assert_eq!(plan.deltas.driver, driver);
    }

    #[test]
    fn deltas_conserve_commission(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        let expected = match facts.mode {
            PaymentMode::CashExceed => {
                facts.cash_paid - facts.fare_amount - facts.commission_amount
            }
            _ => -facts.commission_amount,
        };
        prop_assert_eq!(plan.deltas.rider + plan.deltas.driver, expected);
    }

    #[test]
    fn exactly_one_commission_withdrawal(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        let withdrawals = commission_withdrawals(&plan);
        prop_assert_eq!(withdrawals.len(), 1);
        let commission = withdrawals[0];
        prop_assert_eq!(
            commission.amount,
            facts.commission_amount + facts.penalties.driver
        );
        prop_assert_eq!(commission.commission_amount, facts.commission_amount);
        prop_assert_eq!(commission.fine_amount, facts.penalties.driver);
        prop_assert!(!commission.guard_balance);
    }

    #[test]
    fn rider_wallet_legs_are_guarded(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        for step in &plan.steps {
            if let SettlementStep::WalletTransfer { amount, rider_leg, driver_leg } = step {
                prop_assert_eq!(*amount, facts.wallet_paid);
                prop_assert_eq!(&rider_leg.amount, amount);
                prop_assert_eq!(&driver_leg.amount, amount);
                prop_assert!(rider_leg.guard_balance);
                prop_assert!(!rider_leg.with_invoice);
                prop_assert!(!driver_leg.with_payment);
            }
        }
    }

    #[test]
    fn rider_penalty_step_present_iff_positive(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        let has_rider_penalty = plan.steps.iter().any(|s| {
            matches!(
                s,
                SettlementStep::Withdraw(w) if w.party == Party::Rider && w.with_invoice
            )
        });
        prop_assert_eq!(has_rider_penalty, facts.penalties.rider > Decimal::ZERO);
    }

    #[test]
    fn penalties_applied_flag(facts in facts_strategy()) {
        let plan = SettlementPlan::for_ride(&facts);
        prop_assert_eq!(
            plan.penalties_applied,
            facts.penalties.driver > Decimal::ZERO || facts.penalties.rider > Decimal::ZERO
        );
    }
}
