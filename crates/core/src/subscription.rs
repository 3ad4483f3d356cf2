//! Subscription types and the wallet balance guard.
//!
//! Subscriptions share the settlement flows' guard pattern: the posted
//! wallet balance must cover the price before the subscription and its
//! invoice are created.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Subscription errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Unknown subscription type value.
    #[error("Invalid subscription_type")]
    InvalidType,
    /// Price must be strictly positive.
    #[error("Price must be greater than 0")]
    NonPositivePrice,
    /// Wallet balance does not cover the price.
    #[error("Insufficient balance to pay invoice")]
    InsufficientBalance,
}

/// Subscription plan type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    /// Private car plan.
    Private,
    /// Pinky plan.
    Pinky,
    /// VIP plan.
    Vip,
    /// Van plan.
    Van,
    /// Taxi plan.
    Taxi,
    /// Anything else.
    Other,
}

impl SubscriptionType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Pinky => "pinky",
            Self::Vip => "vip",
            Self::Van => "van",
            Self::Taxi => "taxi",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for SubscriptionType {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "pinky" => Ok(Self::Pinky),
            "vip" => Ok(Self::Vip),
            "van" => Ok(Self::Van),
            "taxi" => Ok(Self::Taxi),
            "other" => Ok(Self::Other),
            _ => Err(SubscriptionError::InvalidType),
        }
    }
}

/// A validated subscription order.
#[derive(Debug, Clone)]
pub struct SubscriptionOrder {
    /// External subscription id from the platform.
    pub external_id: String,
    /// Plan type.
    pub subscription_type: SubscriptionType,
    /// Price paid from the wallet.
    pub price: Decimal,
    /// Coverage start.
    pub start_date: NaiveDate,
    /// Coverage end.
    pub end_date: NaiveDate,
}

impl SubscriptionOrder {
    /// Validates the order figures.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.price <= Decimal::ZERO {
            return Err(SubscriptionError::NonPositivePrice);
        }
        Ok(())
    }
}

/// Rejects a subscription the wallet cannot pay for.
///
/// Runs before the subscription or its invoice exist, so a rejection has
/// zero side effects.
pub fn ensure_wallet_covers(balance: Decimal, price: Decimal) -> Result<(), SubscriptionError> {
    if price > balance {
        return Err(SubscriptionError::InsufficientBalance);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_type_parsing() {
        assert_eq!(
            SubscriptionType::from_str("vip"),
            Ok(SubscriptionType::Vip)
        );
        assert_eq!(
            SubscriptionType::from_str("gold"),
            Err(SubscriptionError::InvalidType)
        );
    }

    #[test]
    fn test_price_must_be_positive() {
        let order = SubscriptionOrder {
            external_id: "S-1".to_string(),
            subscription_type: SubscriptionType::Taxi,
            price: dec!(0),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        };
        assert_eq!(order.validate(), Err(SubscriptionError::NonPositivePrice));
    }

    #[test]
    fn test_balance_guard() {
        assert!(ensure_wallet_covers(dec!(100), dec!(100)).is_ok());
        assert_eq!(
            ensure_wallet_covers(dec!(100), dec!(100.01)),
            Err(SubscriptionError::InsufficientBalance)
        );
    }
}
