//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::AppState;
use farebox_db::ApiKeyRepository;
use farebox_shared::RequestContext;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that resolves bearer API keys.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Looks the key up by hash, scoped to its company
/// 3. Stores the resulting `RequestContext` in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Missing or invalid Authorization header" })),
        )
            .into_response();
    };

    let repo = ApiKeyRepository::new((*state.db).clone());
    match repo.authenticate(token).await {
        Ok(Some(ctx)) => {
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        Ok(None) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid API token" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "API key lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to authenticate request" })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated request context.
///
/// Use this in handlers to get the acting key and company scope:
///
/// ```ignore
/// async fn handler(ApiContext(ctx): ApiContext) -> impl IntoResponse {
///     let company_id = ctx.company_id;
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ApiContext(pub RequestContext);

impl<S> FromRequestParts<S> for ApiContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .copied()
            .map(ApiContext)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing or invalid Authorization header" })),
            ))
    }
}
