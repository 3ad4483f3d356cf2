//! Subscription route: create a subscription paid from the wallet.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::ApiContext, respond};
use farebox_core::subscription::{SubscriptionOrder, SubscriptionType};
use farebox_db::repositories::subscription::SubscriptionRepository;
use farebox_shared::AppError;

/// Creates the subscription routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/create_subscription", post(create_subscription))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a subscription.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Contact id.
    pub partner_id: Option<Uuid>,
    /// External subscription id.
    pub subscription_id: Option<String>,
    /// "private", "pinky", "vip", "van", "taxi", or "other".
    pub subscription_type: Option<String>,
    /// Price paid from the wallet; must be greater than 0.
    #[serde(alias = "Price")]
    pub price: Option<Decimal>,
    /// Coverage start (YYYY-MM-DD).
    pub start_date: Option<NaiveDate>,
    /// Coverage end (YYYY-MM-DD).
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/create_subscription` - Create subscription, invoice, and pay
/// from the wallet.
async fn create_subscription(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<CreateSubscriptionRequest>,
) -> impl IntoResponse {
    let Some(partner_id) = request.partner_id else {
        return respond::validation("partner_id is required");
    };
    let Some(subscription_id) = request.subscription_id.filter(|s| !s.is_empty()) else {
        return respond::validation("subscription_id is required");
    };
    let Some(raw_type) = request.subscription_type.as_deref().filter(|s| !s.is_empty()) else {
        return respond::validation("subscription_type is required");
    };
    let subscription_type = match SubscriptionType::from_str(raw_type) {
        Ok(subscription_type) => subscription_type,
        Err(e) => return respond::validation(&e.to_string()),
    };
    let Some(price) = request.price else {
        return respond::validation("price is required");
    };
    let Some(start_date) = request.start_date else {
        return respond::validation("start_date is required");
    };
    let Some(end_date) = request.end_date else {
        return respond::validation("end_date is required");
    };

    let order = SubscriptionOrder {
        external_id: subscription_id,
        subscription_type,
        price,
        start_date,
        end_date,
    };
    if let Err(e) = order.validate() {
        return respond::validation(&e.to_string());
    }

    let repo = SubscriptionRepository::new((*state.db).clone());
    match repo.create_with_invoice(&ctx, partner_id, &order).await {
        Ok(outcome) => respond::success(
            StatusCode::CREATED,
            "Subscription created and invoiced successfully",
            json!({
                "subscription_id": outcome.subscription.id,
                "partner_id": partner_id,
                "external_subscription_id": outcome.subscription.external_id,
                "subscription_type": outcome.subscription.subscription_type,
                "invoice_id": outcome.invoice.id,
                "invoice_state": outcome.invoice.state,
                "payment_status": "paid",
                "start_date": outcome.subscription.start_date,
                "end_date": outcome.subscription.end_date,
                "balance_after": outcome.balance_after,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Failed to create subscription");
            respond::app_error(&AppError::from(e))
        }
    }
}
