//! Company (tenant) lookup.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use uuid::Uuid;

use farebox_shared::AppError;

use crate::entities::companies;

/// Error types for company lookups.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// The request context points at a company that no longer exists.
    #[error("Company not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CompanyError> for AppError {
    fn from(e: CompanyError) -> Self {
        match e {
            CompanyError::NotFound(id) => Self::Internal(format!("Company not found: {id}")),
            CompanyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository;

impl CompanyRepository {
    /// Loads the company a request is scoped to.
    pub async fn load_in<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
    ) -> Result<companies::Model, CompanyError> {
        companies::Entity::find_by_id(company_id)
            .one(conn)
            .await?
            .ok_or(CompanyError::NotFound(company_id))
    }
}
