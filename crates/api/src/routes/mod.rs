//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod contacts;
pub mod health;
pub mod rides;
pub mod subscriptions;
pub mod wallet;

/// Creates the protected API router (everything under `/api`).
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(contacts::routes())
        .merge(wallet::routes())
        .merge(rides::routes())
        .merge(subscriptions::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
