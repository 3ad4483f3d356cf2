//! Ride settlement planning.
//!
//! Settlement is a one-time transition draft → paid. Each payment mode has
//! its own planner that turns the ride's figures into an ordered list of
//! ledger effects (wallet withdrawals, deposits, and rider→driver wallet
//! transfers) plus the net wallet deltas reported back to the platform.
//! The persistence layer executes the steps in order under the ride and
//! wallet row locks.

use rust_decimal::Decimal;

use super::mode::{PaymentMode, SettlementCase};
use super::penalty::PenaltyTotals;

/// Party whose wallet a step touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    /// The rider's wallet.
    Rider,
    /// The driver's wallet.
    Driver,
}

/// A wallet withdrawal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawStep {
    /// Wallet to debit.
    pub party: Party,
    /// Amount to debit.
    pub amount: Decimal,
    /// Commission component for the invoice.
    pub commission_amount: Decimal,
    /// Fine component for the invoice.
    pub fine_amount: Decimal,
    /// Whether a commission/fine invoice backs this step.
    pub with_invoice: bool,
    /// Whether the posted balance must cover the amount before any
    /// document is created.
    pub guard_balance: bool,
    /// Ledger entry description.
    pub description: String,
}

/// A wallet deposit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositStep {
    /// Wallet to credit.
    pub party: Party,
    /// Signed amount to credit.
    pub amount: Decimal,
    /// Whether a cash payment record backs this step.
    pub with_payment: bool,
    /// Ledger entry description.
    pub description: String,
}

/// One ledger effect of a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementStep {
    /// Debit a wallet.
    Withdraw(WithdrawStep),
    /// Credit a wallet.
    Deposit(DepositStep),
    /// Move wallet value rider → driver backed by a single balanced
    /// transfer entry; both legs' ledger entries reference that document.
    WalletTransfer {
        /// Transfer amount.
        amount: Decimal,
        /// Rider-side debit leg.
        rider_leg: WithdrawStep,
        /// Driver-side credit leg.
        driver_leg: DepositStep,
    },
}

/// The figures a settlement runs on.
#[derive(Debug, Clone)]
pub struct RideFacts {
    /// External ride id, used in entry descriptions.
    pub ride_ref: String,
    /// Fare amount.
    pub fare_amount: Decimal,
    /// Portion paid from the rider's wallet.
    pub wallet_paid: Decimal,
    /// Cash handed to the driver.
    pub cash_paid: Decimal,
    /// Platform commission charged to the driver.
    pub commission_amount: Decimal,
    /// Payment mode.
    pub mode: PaymentMode,
    /// Aggregated penalties.
    pub penalties: PenaltyTotals,
}

/// Net wallet deltas reported in the settlement result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletDeltas {
    /// Net change to the rider's wallet.
    pub rider: Decimal,
    /// Net change to the driver's wallet.
    pub driver: Decimal,
}

/// The full planned effect of settling one ride.
#[derive(Debug, Clone)]
pub struct SettlementPlan {
    /// Case tag for the response.
    pub case: SettlementCase,
    /// Ledger effects in execution order.
    pub steps: Vec<SettlementStep>,
    /// Reported net deltas.
    pub deltas: WalletDeltas,
    /// Whether a commission amount was invoiced.
    pub commission_invoiced: bool,
    /// Whether any penalty was applied.
    pub penalties_applied: bool,
}

impl SettlementPlan {
    /// Plans the settlement for a ride.
    #[must_use]
    pub fn for_ride(facts: &RideFacts) -> Self {
        let (steps, deltas) = match facts.mode {
            PaymentMode::CashOnly => cash_only(facts),
            PaymentMode::CashExceed => cash_exceed(facts),
            PaymentMode::WalletPaid => wallet_paid(facts),
            PaymentMode::WalletCash => wallet_cash(facts),
        };

        Self {
            case: facts.mode.case(),
            steps,
            deltas,
            commission_invoiced: facts.commission_amount > Decimal::ZERO,
            penalties_applied: facts.penalties.any(),
        }
    }
}

/// Commission (+ driver penalty) withdrawal from the driver, invoiced.
///
/// Deliberately not balance-guarded: commission is treated as always
/// collectible and the driver wallet may go negative.
fn commission_withdraw(facts: &RideFacts, context: &str) -> SettlementStep {
    SettlementStep::Withdraw(WithdrawStep {
        party: Party::Driver,
        amount: facts.commission_amount + facts.penalties.driver,
        commission_amount: facts.commission_amount,
        fine_amount: facts.penalties.driver,
        with_invoice: true,
        guard_balance: false,
        description: format!("Ride commission {} ({context})", facts.ride_ref),
    })
}

/// Rider penalty withdrawal, invoiced; only present when a penalty exists.
fn rider_penalty_withdraw(facts: &RideFacts) -> Option<SettlementStep> {
    if facts.penalties.rider <= Decimal::ZERO {
        return None;
    }
    Some(SettlementStep::Withdraw(WithdrawStep {
        party: Party::Rider,
        amount: facts.penalties.rider,
        commission_amount: Decimal::ZERO,
        fine_amount: facts.penalties.rider,
        with_invoice: true,
        guard_balance: false,
        description: format!("Ride penalty {} (rider)", facts.ride_ref),
    }))
}

/// Rider → driver wallet transfer with both ledger legs.
///
/// The rider leg is balance-guarded: the wallet portion of the fare must be
/// covered before any document is created.
fn wallet_transfer(facts: &RideFacts, context: &str) -> SettlementStep {
    SettlementStep::WalletTransfer {
        amount: facts.wallet_paid,
        rider_leg: WithdrawStep {
            party: Party::Rider,
            amount: facts.wallet_paid,
            commission_amount: facts.penalties.rider,
            fine_amount: facts.penalties.driver,
            with_invoice: false,
            guard_balance: true,
            description: format!("Ride wallet amount {} ({context})", facts.ride_ref),
        },
        driver_leg: DepositStep {
            party: Party::Driver,
            amount: facts.wallet_paid,
            with_payment: false,
            description: format!("Driver wallet amount {} ({context})", facts.ride_ref),
        },
    }
}

fn cash_only(facts: &RideFacts) -> (Vec<SettlementStep>, WalletDeltas) {
    let mut steps = vec![commission_withdraw(facts, "cash")];
    steps.extend(rider_penalty_withdraw(facts));

    let deltas = WalletDeltas {
        rider: Decimal::ZERO,
        driver: -facts.commission_amount,
    };
    (steps, deltas)
}

fn cash_exceed(facts: &RideFacts) -> (Vec<SettlementStep>, WalletDeltas) {
    let extra = facts.cash_paid - facts.fare_amount;
    let mut steps = vec![
        SettlementStep::Deposit(DepositStep {
            party: Party::Rider,
            amount: extra,
            with_payment: false,
            description: format!("Ride payment {} (wallet)", facts.ride_ref),
        }),
        SettlementStep::Deposit(DepositStep {
            party: Party::Driver,
            amount: -extra,
            with_payment: false,
            description: format!("Ride payment {} (wallet)", facts.ride_ref),
        }),
        commission_withdraw(facts, "cash"),
    ];
    steps.extend(rider_penalty_withdraw(facts));

    let deltas = WalletDeltas {
        rider: extra,
        driver: -facts.commission_amount,
    };
    (steps, deltas)
}

fn wallet_paid(facts: &RideFacts) -> (Vec<SettlementStep>, WalletDeltas) {
    let mut steps = vec![
        wallet_transfer(facts, "wallet"),
        commission_withdraw(facts, "cash"),
    ];
    steps.extend(rider_penalty_withdraw(facts));

    let deltas = WalletDeltas {
        rider: -facts.fare_amount,
        driver: facts.fare_amount - facts.commission_amount,
    };
    (steps, deltas)
}

fn wallet_cash(facts: &RideFacts) -> (Vec<SettlementStep>, WalletDeltas) {
    let mut steps = Vec::new();

    if facts.wallet_paid > Decimal::ZERO {
        steps.push(wallet_transfer(facts, "wallet part"));
    }

    let diff = facts.fare_amount - facts.wallet_paid;
    if facts.cash_paid > diff {
        let due = facts.cash_paid - diff;
        steps.push(SettlementStep::Deposit(DepositStep {
            party: Party::Rider,
            amount: due,
            with_payment: true,
            description: format!("Ride wallet amount {} (cash part)", facts.ride_ref),
        }));
        steps.push(SettlementStep::Deposit(DepositStep {
            party: Party::Driver,
            amount: -due,
            with_payment: true,
            description: format!("Ride wallet amount {} (cash part)", facts.ride_ref),
        }));
    }

    steps.push(commission_withdraw(facts, "wallet+cash"));
    steps.extend(rider_penalty_withdraw(facts));

    let deltas = WalletDeltas {
        rider: -facts.wallet_paid,
        driver: facts.wallet_paid - facts.commission_amount,
    };
    (steps, deltas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn facts(mode: PaymentMode) -> RideFacts {
        RideFacts {
            ride_ref: "R-100".to_string(),
            fare_amount: dec!(100),
            wallet_paid: dec!(0),
            cash_paid: dec!(0),
            commission_amount: dec!(10),
            mode,
            penalties: PenaltyTotals::default(),
        }
    }

    #[test]
    fn test_cash_only_with_driver_penalty() {
        // fare=100, commission=10, driver penalty=5, rider penalty=0:
        // one invoiced withdrawal with commission 10 + fine 5, deltas (0, -10).
        let mut f = facts(PaymentMode::CashOnly);
        f.penalties.driver = dec!(5);

        let plan = SettlementPlan::for_ride(&f);
        assert_eq!(plan.case, SettlementCase::CashOnly);
        assert_eq!(plan.steps.len(), 1);
        let SettlementStep::Withdraw(step) = &plan.steps[0] else {
            panic!("expected withdraw");
        };
        assert_eq!(step.party, Party::Driver);
        assert_eq!(step.amount, dec!(15));
        assert_eq!(step.commission_amount, dec!(10));
        assert_eq!(step.fine_amount, dec!(5));
        assert!(step.with_invoice);
        assert!(!step.guard_balance);
        assert_eq!(plan.deltas.rider, Decimal::ZERO);
        assert_eq!(plan.deltas.driver, dec!(-10));
        assert!(plan.commission_invoiced);
        assert!(plan.penalties_applied);
    }

    #[test]
    fn test_cash_only_rider_penalty_adds_step() {
        let mut f = facts(PaymentMode::CashOnly);
        f.penalties.rider = dec!(3);

        let plan = SettlementPlan::for_ride(&f);
        assert_eq!(plan.steps.len(), 2);
        let SettlementStep::Withdraw(step) = &plan.steps[1] else {
            panic!("expected withdraw");
        };
        assert_eq!(step.party, Party::Rider);
        assert_eq!(step.amount, dec!(3));
        assert_eq!(step.fine_amount, dec!(3));
        assert_eq!(step.commission_amount, Decimal::ZERO);
    }

    #[test]
    fn test_cash_exceed_deposits_extra_both_sides() {
        let mut f = facts(PaymentMode::CashExceed);
        f.cash_paid = dec!(120);

        let plan = SettlementPlan::for_ride(&f);
        assert_eq!(plan.case, SettlementCase::CashExceed);
        let SettlementStep::Deposit(rider) = &plan.steps[0] else {
            panic!("expected deposit");
        };
        let SettlementStep::Deposit(driver) = &plan.steps[1] else {
            panic!("expected deposit");
        };
        assert_eq!(rider.party, Party::Rider);
        assert_eq!(rider.amount, dec!(20));
        assert!(!rider.with_payment);
        assert_eq!(driver.party, Party::Driver);
        assert_eq!(driver.amount, dec!(-20));
        assert!(matches!(plan.steps[2], SettlementStep::Withdraw(_)));
        assert_eq!(plan.deltas.rider, dec!(20));
        assert_eq!(plan.deltas.driver, dec!(-10));
    }

    #[test]
    fn test_wallet_paid_conservation() {
        // W=F=100, C=10, no penalties: rider −100, driver +90, exactly one
        // transfer of 100 linking both legs.
        let mut f = facts(PaymentMode::WalletPaid);
        f.wallet_paid = dec!(100);

        let plan = SettlementPlan::for_ride(&f);
        assert_eq!(plan.case, SettlementCase::WalletOnly);
        assert_eq!(plan.steps.len(), 2);

        let SettlementStep::WalletTransfer {
            amount,
            rider_leg,
            driver_leg,
        } = &plan.steps[0]
        else {
            panic!("expected transfer");
        };
        assert_eq!(*amount, dec!(100));
        assert_eq!(rider_leg.amount, dec!(100));
        assert!(rider_leg.guard_balance);
        assert!(!rider_leg.with_invoice);
        assert_eq!(driver_leg.amount, dec!(100));
        assert!(!driver_leg.with_payment);

        assert_eq!(plan.deltas.rider, dec!(-100));
        assert_eq!(plan.deltas.driver, dec!(90));
    }

    #[test]
    fn test_wallet_cash_split() {
        // fare=100, wallet=60, cash=50, commission=5: diff=40, due=10;
        // rider +10 / driver −10 with payment docs; transfer of 60;
        // deltas rider −60, driver +55.
        let mut f = facts(PaymentMode::WalletCash);
        f.wallet_paid = dec!(60);
        f.cash_paid = dec!(50);
        f.commission_amount = dec!(5);

        let plan = SettlementPlan::for_ride(&f);
        assert_eq!(plan.case, SettlementCase::WalletPlusCash);
        assert_eq!(plan.steps.len(), 4);

        let SettlementStep::WalletTransfer { amount, .. } = &plan.steps[0] else {
            panic!("expected transfer");
        };
        assert_eq!(*amount, dec!(60));

        let SettlementStep::Deposit(rider_due) = &plan.steps[1] else {
            panic!("expected deposit");
        };
        let SettlementStep::Deposit(driver_due) = &plan.steps[2] else {
            panic!("expected deposit");
        };
        assert_eq!(rider_due.amount, dec!(10));
        assert!(rider_due.with_payment);
        assert_eq!(driver_due.amount, dec!(-10));
        assert!(driver_due.with_payment);

        let SettlementStep::Withdraw(commission) = &plan.steps[3] else {
            panic!("expected withdraw");
        };
        assert_eq!(commission.amount, dec!(5));

        assert_eq!(plan.deltas.rider, dec!(-60));
        assert_eq!(plan.deltas.driver, dec!(55));
    }

    #[test]
    fn test_wallet_cash_no_wallet_portion_skips_transfer() {
        let mut f = facts(PaymentMode::WalletCash);
        f.cash_paid = dec!(100);

        let plan = SettlementPlan::for_ride(&f);
        assert!(
            !plan
                .steps
                .iter()
                .any(|s| matches!(s, SettlementStep::WalletTransfer { .. }))
        );
        // cash == diff: no due deposits either, just the commission step.
        assert_eq!(plan.steps.len(), 1);
    }

    #[test]
    fn test_commission_invoiced_flag_requires_positive_commission() {
        let mut f = facts(PaymentMode::CashOnly);
        f.commission_amount = Decimal::ZERO;
        let plan = SettlementPlan::for_ride(&f);
        assert!(!plan.commission_invoiced);
        // The withdrawal still happens (zero-amount commission invoice).
        assert_eq!(plan.steps.len(), 1);
    }
}
