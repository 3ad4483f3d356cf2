//! Contact registration and update routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::ApiContext, respond};
use farebox_core::contact::{ContactType, Gender, Registration};
use farebox_db::repositories::contact::{ContactChanges, ContactIdentifier, ContactRepository};
use farebox_shared::AppError;

/// Creates the contact routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register_contact", post(register_contact))
        .route("/update_contact", put(update_contact))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for registering a contact.
#[derive(Debug, Deserialize)]
pub struct RegisterContactRequest {
    /// External platform id.
    pub sub_id: Option<String>,
    /// Contact name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Mobile number.
    pub mobile: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Gender: "male" or "female".
    pub gender: Option<String>,
    /// Contact type: "driver" or "rider".
    pub contact_type: Option<String>,
    /// Welcome coupon value.
    pub coupon_value: Option<Decimal>,
}

/// Request body for updating a contact.
#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    /// Internal contact id.
    pub partner_id: Option<Uuid>,
    /// Email (identifier and/or new value).
    pub email: Option<String>,
    /// Mobile (identifier and/or new value).
    pub mobile: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New gender.
    pub gender: Option<String>,
    /// New contact type.
    pub contact_type: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/register_contact` - Create a contact and its wallet.
async fn register_contact(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<RegisterContactRequest>,
) -> impl IntoResponse {
    let Some(sub_id) = request.sub_id.filter(|s| !s.trim().is_empty()) else {
        return respond::validation("sub_id is required");
    };
    let Some(name) = request.name.filter(|s| !s.trim().is_empty()) else {
        return respond::validation("name is required");
    };

    let gender = match request.gender.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match Gender::from_str(raw) {
            Ok(gender) => Some(gender),
            Err(e) => return respond::validation(&e.to_string()),
        },
    };
    let contact_type = match request.contact_type.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match ContactType::from_str(raw) {
            Ok(contact_type) => Some(contact_type),
            Err(e) => return respond::validation(&e.to_string()),
        },
    };

    let registration = Registration {
        sub_id,
        name,
        email: request.email,
        mobile: request.mobile,
        city: request.city,
        gender,
        contact_type,
        coupon_value: request.coupon_value.unwrap_or(Decimal::ZERO),
    };
    if let Err(e) = registration.validate() {
        return respond::validation(&e.to_string());
    }

    let repo = ContactRepository::new((*state.db).clone());
    match repo.register(&ctx, &registration).await {
        Ok(registered) => respond::success(
            StatusCode::CREATED,
            "Contact registered successfully",
            json!({
                "partner_id": registered.contact.id,
                "name": registered.contact.name,
                "email": registered.contact.email.clone().unwrap_or_default(),
                "mobile": registered.contact.mobile.clone().unwrap_or_default(),
                "wallet_id": registered.wallet.id,
                "wallet_balance": registered.wallet_balance,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Failed to register contact");
            respond::app_error(&AppError::from(e))
        }
    }
}

/// PUT `/api/update_contact` - Partial update of a contact.
async fn update_contact(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<UpdateContactRequest>,
) -> impl IntoResponse {
    let identifier = if let Some(id) = request.partner_id {
        ContactIdentifier::Id(id)
    } else if let Some(email) = request.email.clone().filter(|s| !s.is_empty()) {
        ContactIdentifier::Email(email)
    } else if let Some(mobile) = request.mobile.clone().filter(|s| !s.is_empty()) {
        ContactIdentifier::Mobile(mobile)
    } else {
        return respond::validation("partner_id, email or mobile is required");
    };

    let gender = match request.gender.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match Gender::from_str(raw) {
            Ok(gender) => Some(gender),
            Err(e) => return respond::validation(&e.to_string()),
        },
    };
    let contact_type = match request.contact_type.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match ContactType::from_str(raw) {
            Ok(contact_type) => Some(contact_type),
            Err(e) => return respond::validation(&e.to_string()),
        },
    };

    let changes = ContactChanges {
        name: request.name,
        email: request.email,
        mobile: request.mobile,
        city: request.city,
        gender,
        contact_type,
    };

    let repo = ContactRepository::new((*state.db).clone());
    match repo.update(&ctx, &identifier, changes).await {
        Ok(contact) => respond::success(
            StatusCode::OK,
            "Contact updated successfully",
            json!({
                "partner_id": contact.id,
                "name": contact.name,
                "email": contact.email.clone().unwrap_or_default(),
                "mobile": contact.mobile.clone().unwrap_or_default(),
                "city": contact.city.clone().unwrap_or_default(),
                "gender": contact.gender.clone().map(|g| Gender::from(g).as_str()).unwrap_or_default(),
                "contact_type": contact.contact_type.clone().map(|t| ContactType::from(t).as_str()).unwrap_or_default(),
            }),
        ),
        Err(e) => {
            error!(error = %e, "Failed to update contact");
            respond::app_error(&AppError::from(e))
        }
    }
}
