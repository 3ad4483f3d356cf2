//! API key repository: bearer-token resolution.
//!
//! Tokens are stored as SHA-256 hashes; a lookup resolves a bearer token to
//! the request context (acting key + company scope) threaded through every
//! core call.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use sha2::{Digest, Sha256};

use farebox_shared::types::{ApiKeyId, CompanyId, RequestContext};

use crate::entities::api_keys;

/// API key repository.
#[derive(Debug, Clone)]
pub struct ApiKeyRepository {
    db: DatabaseConnection,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hashes a bearer token for storage and lookup.
    #[must_use]
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Resolves a bearer token to a request context.
    ///
    /// Returns `None` for unknown or deactivated keys.
    pub async fn authenticate(&self, token: &str) -> Result<Option<RequestContext>, DbErr> {
        let key_hash = Self::hash_token(token);

        let key = api_keys::Entity::find()
            .filter(api_keys::Column::KeyHash.eq(key_hash))
            .filter(api_keys::Column::Active.eq(true))
            .one(&self.db)
            .await?;

        Ok(key.map(|key| {
            RequestContext::new(
                ApiKeyId::from_uuid(key.id),
                CompanyId::from_uuid(key.company_id),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let a = ApiKeyRepository::hash_token("secret-token");
        let b = ApiKeyRepository::hash_token("secret-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_tokens_hash_differently() {
        assert_ne!(
            ApiKeyRepository::hash_token("token-a"),
            ApiKeyRepository::hash_token("token-b")
        );
    }
}
