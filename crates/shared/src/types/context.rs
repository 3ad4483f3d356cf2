//! Request-scoped identity and company context.
//!
//! Every core call receives an explicit `RequestContext` rather than reading
//! an ambient "current user/company" from process state. The auth middleware
//! builds one per request from the bearer API key.

use serde::{Deserialize, Serialize};

use super::id::{ApiKeyId, CompanyId};

/// The acting principal and company scope for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// The API key the request authenticated with.
    pub api_key_id: ApiKeyId,
    /// The company all lookups and mutations are scoped to.
    pub company_id: CompanyId,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub const fn new(api_key_id: ApiKeyId, company_id: CompanyId) -> Self {
        Self {
            api_key_id,
            company_id,
        }
    }
}
