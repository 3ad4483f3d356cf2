//! Contact repository: registration, lookup, and partial updates.
//!
//! Registration creates the contact and its wallet together; a positive
//! coupon value additionally creates a posted welcome-coupon credit note
//! and the initial ledger entry.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use farebox_core::contact::{ContactType, Gender, Registration};
use farebox_core::documents::{CreditNoteSpec, InvoiceLineSpec};
use farebox_core::wallet::{DepositMethod, DepositRequest, DocumentRef, EntryStatus};
use farebox_shared::AppError;
use farebox_shared::types::{ContactId, DocumentId, RequestContext};

use super::company::{CompanyError, CompanyRepository};
use super::document::{DocumentError, DocumentRepository};
use super::wallet::{WalletError, WalletRepository};
use crate::entities::{contacts, wallets};

/// Error types for contact operations.
#[derive(Debug, thiserror::Error)]
pub enum ContactRepoError {
    /// A contact with this sub_id or mobile already exists in the company.
    #[error("Contact with this sub_id or mobile already exists")]
    Duplicate,

    /// No contact matched the given identifier.
    #[error("No contact found with this email or mobile")]
    NotFound,

    /// Document factory error (welcome coupon).
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Wallet operation error.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Company lookup error.
    #[error(transparent)]
    Company(#[from] CompanyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ContactRepoError> for AppError {
    fn from(e: ContactRepoError) -> Self {
        match e {
            ContactRepoError::Duplicate => Self::Conflict(e.to_string()),
            ContactRepoError::NotFound => Self::NotFound(e.to_string()),
            ContactRepoError::Document(e) => e.into(),
            ContactRepoError::Wallet(e) => e.into(),
            ContactRepoError::Company(e) => e.into(),
            ContactRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Identifier used to locate a contact for update.
#[derive(Debug, Clone)]
pub enum ContactIdentifier {
    /// By internal contact id.
    Id(Uuid),
    /// By email.
    Email(String),
    /// By mobile number.
    Mobile(String),
}

/// Partial update of a contact.
#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
    /// New name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New gender.
    pub gender: Option<Gender>,
    /// New contact type.
    pub contact_type: Option<ContactType>,
}

/// A freshly registered contact with its wallet.
#[derive(Debug, Clone)]
pub struct RegisteredContact {
    /// The contact row.
    pub contact: contacts::Model,
    /// The wallet row.
    pub wallet: wallets::Model,
    /// Posted balance after registration (coupon credit included).
    pub wallet_balance: Decimal,
}

/// Contact repository.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: DatabaseConnection,
}

impl ContactRepository {
    /// Creates a new contact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a contact and creates its wallet.
    ///
    /// With a positive coupon value a posted credit note and an initial
    /// posted ledger entry are created and the balance reflects the coupon.
    pub async fn register(
        &self,
        ctx: &RequestContext,
        registration: &Registration,
    ) -> Result<RegisteredContact, ContactRepoError> {
        let company_id = ctx.company_id.into_inner();

        let mut duplicate_filter = Condition::any();
        duplicate_filter = duplicate_filter.add(contacts::Column::SubId.eq(registration.sub_id.clone()));
        if let Some(mobile) = &registration.mobile {
            duplicate_filter = duplicate_filter.add(contacts::Column::Mobile.eq(mobile.clone()));
        }
        let existing = contacts::Entity::find()
            .filter(contacts::Column::CompanyId.eq(company_id))
            .filter(duplicate_filter)
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ContactRepoError::Duplicate);
        }

        let txn = self.db.begin().await?;
        let company = CompanyRepository::load_in(&txn, company_id).await?;

        let contact = contacts::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            sub_id: Set(registration.sub_id.clone()),
            name: Set(registration.name.clone()),
            email: Set(registration.email.clone()),
            mobile: Set(registration.mobile.clone()),
            city: Set(registration.city.clone()),
            gender: Set(registration.gender.map(Into::into)),
            contact_type: Set(registration.contact_type.map(Into::into)),
            receivable_account_id: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let wallet = wallets::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            contact_id: Set(contact.id),
            balance: Set(Decimal::ZERO),
            currency: Set(company.currency.clone()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let mut wallet_balance = Decimal::ZERO;
        if registration.coupon_value > Decimal::ZERO {
            let credit_note = DocumentRepository::create_credit_note_in(
                &txn,
                &company,
                &CreditNoteSpec {
                    partner: ContactId::from_uuid(contact.id),
                    line: InvoiceLineSpec::coupon(registration.coupon_value),
                },
            )
            .await?;

            let effect = farebox_core::wallet::plan_deposit(&DepositRequest {
                amount: registration.coupon_value,
                description: "Welcome Coupon - Service Credit".to_string(),
                status: EntryStatus::Posted,
                payer: ContactId::from_uuid(contact.id),
                create_payment: false,
                fallback_document: DocumentRef::Invoice(DocumentId::from_uuid(credit_note.id)),
                deposit_method: DepositMethod::Direct,
                reference: None,
                bank: None,
                account_number: None,
            })
            .map_err(|e| WalletError::InvalidSpec(e.to_string()))?;
            WalletRepository::execute_effect_in(&txn, &company, wallet.id, effect).await?;
            wallet_balance = WalletRepository::refresh_balance_in(&txn, wallet.id).await?;
        }

        txn.commit().await?;
        info!(
            sub_id = %registration.sub_id,
            wallet_balance = %wallet_balance,
            "Contact registered"
        );

        Ok(RegisteredContact {
            contact,
            wallet,
            wallet_balance,
        })
    }

    /// Finds a contact by identifier within the request's company.
    pub async fn identify(
        &self,
        ctx: &RequestContext,
        identifier: &ContactIdentifier,
    ) -> Result<Option<contacts::Model>, ContactRepoError> {
        let mut query = contacts::Entity::find()
            .filter(contacts::Column::CompanyId.eq(ctx.company_id.into_inner()));
        query = match identifier {
            ContactIdentifier::Id(id) => query.filter(contacts::Column::Id.eq(*id)),
            ContactIdentifier::Email(email) => {
                query.filter(contacts::Column::Email.eq(email.clone()))
            }
            ContactIdentifier::Mobile(mobile) => {
                query.filter(contacts::Column::Mobile.eq(mobile.clone()))
            }
        };
        Ok(query.one(&self.db).await?)
    }

    /// Applies a partial update to a contact.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        identifier: &ContactIdentifier,
        changes: ContactChanges,
    ) -> Result<contacts::Model, ContactRepoError> {
        let contact = self
            .identify(ctx, identifier)
            .await?
            .ok_or(ContactRepoError::NotFound)?;

        let mut active: contacts::ActiveModel = contact.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(Some(email));
        }
        if let Some(mobile) = changes.mobile {
            active.mobile = Set(Some(mobile));
        }
        if let Some(city) = changes.city {
            active.city = Set(Some(city));
        }
        if let Some(gender) = changes.gender {
            active.gender = Set(Some(gender.into()));
        }
        if let Some(contact_type) = changes.contact_type {
            active.contact_type = Set(Some(contact_type.into()));
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }
}
