//! Ride settlement route.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::ApiContext, respond};
use farebox_core::settlement::{PaymentMode, Penalty, PenaltyParty};
use farebox_db::repositories::ride::{RideRepository, SettleRideInput};
use farebox_shared::AppError;

/// Creates the ride routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ride/pay", post(pay_ride))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for settling a ride.
#[derive(Debug, Deserialize)]
pub struct PayRideRequest {
    /// External ride id.
    pub ride_id: Option<String>,
    /// Fare amount; must be greater than 0.
    pub fare_amount: Option<Decimal>,
    /// Wallet portion of the fare; must be >= 0.
    pub wallet_paid: Option<Decimal>,
    /// Cash handed to the driver.
    pub cash_paid: Option<Decimal>,
    /// Platform commission.
    pub commission_amount: Option<Decimal>,
    /// Penalty items; malformed entries are ignored.
    pub penalties: Option<Vec<serde_json::Value>>,
    /// Rider contact id.
    pub rider_id: Option<Uuid>,
    /// Driver contact id.
    pub driver_id: Option<Uuid>,
    /// "cash_only", "cash_exceed", "wallet_paid", or "wallet_cash".
    pub payment_mode: Option<String>,
}

/// Decodes the raw penalty list, dropping malformed items.
fn decode_penalties(raw: &[serde_json::Value]) -> Vec<Penalty> {
    let mut penalties = Vec::new();
    for item in raw {
        let Some(object) = item.as_object() else {
            continue;
        };
        let party = match object
            .get("party")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_lowercase())
            .as_deref()
        {
            Some("driver") => PenaltyParty::Driver,
            Some("rider") => PenaltyParty::Rider,
            _ => continue,
        };
        let Some(amount) = object.get("amount").and_then(decode_amount) else {
            continue;
        };
        penalties.push(Penalty { party, amount });
    }
    penalties
}

fn decode_amount(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        serde_json::Value::String(s) => Decimal::from_str(s).ok(),
        _ => None,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/ride/pay` - Settle a ride.
async fn pay_ride(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<PayRideRequest>,
) -> impl IntoResponse {
    let Some(raw_mode) = request.payment_mode.as_deref().filter(|s| !s.is_empty()) else {
        return respond::validation("payment_mode is required");
    };
    let mode = match PaymentMode::from_str(raw_mode) {
        Ok(mode) => mode,
        Err(e) => return respond::validation(&e.to_string()),
    };
    let Some(ride_id) = request.ride_id.filter(|s| !s.is_empty()) else {
        return respond::validation("ride_id is required");
    };
    let Some(fare_amount) = request.fare_amount.filter(|f| *f > Decimal::ZERO) else {
        return respond::validation("fare_amount must be > 0");
    };
    let wallet_paid = request.wallet_paid.unwrap_or(Decimal::ZERO);
    if wallet_paid < Decimal::ZERO {
        return respond::validation("wallet_paid is required and must be >= 0");
    }
    let Some(rider_id) = request.rider_id else {
        return respond::validation("rider_id is required");
    };
    let Some(driver_id) = request.driver_id else {
        return respond::validation("driver_id is required");
    };

    let input = SettleRideInput {
        external_id: ride_id,
        rider_id,
        driver_id,
        fare_amount,
        wallet_paid,
        cash_paid: request.cash_paid.unwrap_or(Decimal::ZERO),
        commission_amount: request.commission_amount.unwrap_or(Decimal::ZERO),
        penalties: decode_penalties(request.penalties.as_deref().unwrap_or(&[])),
        mode,
    };

    let repo = RideRepository::new((*state.db).clone());
    match repo.settle(&ctx, input).await {
        Ok(outcome) => respond::success(
            StatusCode::OK,
            "Ride settled successfully",
            json!({
                "ride_id": outcome.ride_id,
                "case": outcome.case,
                "wallet_movements": {
                    "rider_wallet_delta": outcome.deltas.rider,
                    "driver_wallet_delta": outcome.deltas.driver,
                },
                "commission": {
                    "amount": outcome.commission_amount,
                    "invoiced": outcome.commission_invoiced,
                },
                "penalties_applied": outcome.penalties_applied,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Failed to settle ride");
            respond::app_error(&AppError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decode_penalties_accepts_valid_items() {
        let raw = vec![
            json!({"party": "driver", "amount": 5}),
            json!({"party": " Rider ", "amount": "3.50"}),
        ];
        let penalties = decode_penalties(&raw);
        assert_eq!(penalties.len(), 2);
        assert_eq!(penalties[0].party, PenaltyParty::Driver);
        assert_eq!(penalties[0].amount, dec!(5));
        assert_eq!(penalties[1].party, PenaltyParty::Rider);
        assert_eq!(penalties[1].amount, dec!(3.50));
    }

    #[test]
    fn test_decode_penalties_drops_malformed_items() {
        let raw = vec![
            json!("not an object"),
            json!({"party": "conductor", "amount": 5}),
            json!({"party": "driver"}),
            json!({"party": "driver", "amount": true}),
            json!(42),
        ];
        assert!(decode_penalties(&raw).is_empty());
    }

    #[test]
    fn test_decode_amount_number_and_string() {
        assert_eq!(decode_amount(&json!(12.75)), Some(dec!(12.75)));
        assert_eq!(decode_amount(&json!("8")), Some(dec!(8)));
        assert_eq!(decode_amount(&json!(null)), None);
    }
}
