//! Payment modes and settlement case tags.

use serde::{Deserialize, Serialize};

use super::error::SettlementError;

/// How a ride was paid.
///
/// A closed enum: adding a mode is a compile-time-checked addition with its
/// own planner, not another branch in a conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Fare fully in cash; only commission/penalties touch wallets.
    CashOnly,
    /// Cash handed over exceeds the fare; the excess lands in wallets.
    CashExceed,
    /// Fare fully from the rider's wallet.
    WalletPaid,
    /// Fare split between wallet and cash.
    WalletCash,
}

impl PaymentMode {
    /// The case tag reported in the settlement result.
    #[must_use]
    pub const fn case(self) -> SettlementCase {
        match self {
            Self::CashOnly => SettlementCase::CashOnly,
            Self::CashExceed => SettlementCase::CashExceed,
            Self::WalletPaid => SettlementCase::WalletOnly,
            Self::WalletCash => SettlementCase::WalletPlusCash,
        }
    }

    /// Wire name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnly => "cash_only",
            Self::CashExceed => "cash_exceed",
            Self::WalletPaid => "wallet_paid",
            Self::WalletCash => "wallet_cash",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash_only" => Ok(Self::CashOnly),
            "cash_exceed" => Ok(Self::CashExceed),
            "wallet_paid" => Ok(Self::WalletPaid),
            "wallet_cash" => Ok(Self::WalletCash),
            other => Err(SettlementError::InvalidMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case tag reported back to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementCase {
    /// cash_only settlement.
    #[serde(rename = "CASH_ONLY")]
    CashOnly,
    /// cash_exceed settlement.
    #[serde(rename = "CASH_EXCEED")]
    CashExceed,
    /// wallet_paid settlement.
    #[serde(rename = "WALLET_ONLY")]
    WalletOnly,
    /// wallet_cash settlement.
    #[serde(rename = "WALLET_PLUS_CASH")]
    WalletPlusCash,
}

impl SettlementCase {
    /// Wire name of this case.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnly => "CASH_ONLY",
            Self::CashExceed => "CASH_EXCEED",
            Self::WalletOnly => "WALLET_ONLY",
            Self::WalletPlusCash => "WALLET_PLUS_CASH",
        }
    }
}

impl std::fmt::Display for SettlementCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_mode_roundtrip() {
        for mode in [
            PaymentMode::CashOnly,
            PaymentMode::CashExceed,
            PaymentMode::WalletPaid,
            PaymentMode::WalletCash,
        ] {
            assert_eq!(PaymentMode::from_str(mode.as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let err = PaymentMode::from_str("credit_card").unwrap_err();
        assert!(matches!(err, SettlementError::InvalidMode(m) if m == "credit_card"));
    }

    #[test]
    fn test_case_tags() {
        assert_eq!(PaymentMode::CashOnly.case().as_str(), "CASH_ONLY");
        assert_eq!(PaymentMode::CashExceed.case().as_str(), "CASH_EXCEED");
        assert_eq!(PaymentMode::WalletPaid.case().as_str(), "WALLET_ONLY");
        assert_eq!(PaymentMode::WalletCash.case().as_str(), "WALLET_PLUS_CASH");
    }
}
