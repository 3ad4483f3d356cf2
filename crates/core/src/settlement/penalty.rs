//! Penalty aggregation.
//!
//! A settlement request carries a list of penalties against either party.
//! They are summed per party before the mode planner runs; non-positive
//! amounts are ignored (malformed items were already dropped during request
//! decoding).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which party a penalty is charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltyParty {
    /// Charged to the driver.
    Driver,
    /// Charged to the rider.
    Rider,
}

/// One penalty item from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalty {
    /// Charged party.
    pub party: PenaltyParty,
    /// Penalty amount.
    pub amount: Decimal,
}

/// Per-party penalty totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenaltyTotals {
    /// Total charged to the driver.
    pub driver: Decimal,
    /// Total charged to the rider.
    pub rider: Decimal,
}

impl PenaltyTotals {
    /// True when either party has a penalty.
    #[must_use]
    pub fn any(&self) -> bool {
        self.driver > Decimal::ZERO || self.rider > Decimal::ZERO
    }
}

/// Sums positive penalty amounts per party.
#[must_use]
pub fn aggregate(penalties: &[Penalty]) -> PenaltyTotals {
    let mut totals = PenaltyTotals::default();
    for penalty in penalties {
        if penalty.amount <= Decimal::ZERO {
            continue;
        }
        match penalty.party {
            PenaltyParty::Driver => totals.driver += penalty.amount,
            PenaltyParty::Rider => totals.rider += penalty.amount,
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate_sums_per_party() {
        let totals = aggregate(&[
            Penalty {
                party: PenaltyParty::Driver,
                amount: dec!(5),
            },
            Penalty {
                party: PenaltyParty::Rider,
                amount: dec!(3),
            },
            Penalty {
                party: PenaltyParty::Driver,
                amount: dec!(2),
            },
        ]);
        assert_eq!(totals.driver, dec!(7));
        assert_eq!(totals.rider, dec!(3));
        assert!(totals.any());
    }

    #[test]
    fn test_non_positive_amounts_ignored() {
        let totals = aggregate(&[
            Penalty {
                party: PenaltyParty::Driver,
                amount: dec!(0),
            },
            Penalty {
                party: PenaltyParty::Rider,
                amount: dec!(-4),
            },
        ]);
        assert_eq!(totals, PenaltyTotals::default());
        assert!(!totals.any());
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(aggregate(&[]), PenaltyTotals::default());
    }
}
