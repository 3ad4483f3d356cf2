//! Subscription repository: subscription + invoice paid from the wallet.
//!
//! Shares the settlement flows' guard pattern: the posted balance must
//! cover the price before the subscription or its invoice exist. After the
//! local commit a best-effort reconciliation pass matches open inbound
//! payments against the invoice; its failure surfaces as an error but does
//! not roll back the already-created documents.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use farebox_core::documents::{InvoiceLineSpec, InvoiceSpec, ProductKind};
use farebox_core::subscription::{SubscriptionOrder, ensure_wallet_covers};
use farebox_shared::AppError;
use farebox_shared::types::{ContactId, RequestContext};

use super::company::{CompanyError, CompanyRepository};
use super::document::{DocumentError, DocumentRepository};
use super::wallet::{WalletError, WalletRepository};
use crate::entities::{
    accounting_documents, contacts, ledger_entries,
    sea_orm_active_enums::{
        DepositMethod, DocumentKind, DocumentState, EntryStatus, OrderRefKind, PaymentDirection,
    },
    subscriptions,
};

/// Error types for subscription operations.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionRepoError {
    /// Contact not found in this company.
    #[error("Partner not found")]
    PartnerNotFound,

    /// Contact has no wallet.
    #[error("Wallet not found for this partner")]
    WalletNotFound,

    /// A subscription with this external id already exists.
    #[error("Subscription with this id already exists")]
    Duplicate,

    /// Posted balance does not cover the price.
    #[error("Insufficient balance to pay invoice")]
    InsufficientBalance,

    /// Post-commit reconciliation failed; the invoice stands.
    #[error("Failed to reconcile payment: {0}")]
    ReconciliationFailed(String),

    /// Document factory error.
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

impl From<SubscriptionRepoError> for AppError {
    fn from(e: SubscriptionRepoError) -> Self {
        match e {
            SubscriptionRepoError::PartnerNotFound | SubscriptionRepoError::WalletNotFound => {
                Self::NotFound(e.to_string())
            }
            SubscriptionRepoError::Duplicate => Self::Conflict(e.to_string()),
            SubscriptionRepoError::InsufficientBalance => Self::PaymentRequired(e.to_string()),
            SubscriptionRepoError::ReconciliationFailed(_) => Self::Internal(e.to_string()),
            SubscriptionRepoError::Document(e) => e.into(),
            SubscriptionRepoError::Wallet(e) => e.into(),
            SubscriptionRepoError::Company(e) => e.into(),
            SubscriptionRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Result of creating a wallet-paid subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionOutcome {
    /// The subscription row.
    pub subscription: subscriptions::Model,
    /// The posted invoice.
    pub invoice: accounting_documents::Model,
    /// Posted balance after the wallet debit.
    pub balance_after: Decimal,
}

/// Subscription repository.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    db: DatabaseConnection,
}

impl SubscriptionRepository {
    /// Creates a new subscription repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a subscription with its posted invoice and pays it from the
    /// contact's wallet.
    pub async fn create_with_invoice(
        &self,
        ctx: &RequestContext,
        contact_id: Uuid,
        order: &SubscriptionOrder,
    ) -> Result<SubscriptionOutcome, SubscriptionRepoError> {
        let company_id = ctx.company_id.into_inner();

        let existing = subscriptions::Entity::find()
            .filter(subscriptions::Column::CompanyId.eq(company_id))
            .filter(subscriptions::Column::ExternalId.eq(order.external_id.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(SubscriptionRepoError::Duplicate);
        }

        let txn = self.db.begin().await?;
        let company = CompanyRepository::load_in(&txn, company_id).await?;

        let contact = contacts::Entity::find_by_id(contact_id)
            .one(&txn)
            .await?
            .filter(|c| c.company_id == company_id)
            .ok_or(SubscriptionRepoError::PartnerNotFound)?;

        let wallet = WalletRepository::lock_wallet_by_contact_in(&txn, contact.id)
            .await
            .map_err(|e| match e {
                WalletError::NotFound => SubscriptionRepoError::WalletNotFound,
                other => SubscriptionRepoError::Wallet(other),
            })?;

        // Balance guard before the subscription or invoice exist.
        let balance = WalletRepository::posted_balance_in(&txn, wallet.id).await?;
        ensure_wallet_covers(balance, order.price)
            .map_err(|_| SubscriptionRepoError::InsufficientBalance)?;

        let subscription = subscriptions::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company_id),
            contact_id: Set(contact.id),
            external_id: Set(order.external_id.clone()),
            subscription_type: Set(order.subscription_type.into()),
            price: Set(order.price),
            start_date: Set(order.start_date),
            end_date: Set(order.end_date),
            invoice_id: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let journal_id =
            DocumentRepository::resolve_subscription_journal_in(&txn, &company).await?;
        let invoice_spec = InvoiceSpec::new(
            ContactId::from_uuid(contact.id),
            vec![InvoiceLineSpec {
                product: ProductKind::Subscription,
                label: order.subscription_type.as_str().to_string(),
                amount: order.price,
            }],
        )
        .map_err(|e| WalletError::InvalidSpec(e.to_string()))?;
        let invoice =
            DocumentRepository::create_invoice_in(&txn, &company, &invoice_spec, Some(journal_id))
                .await?;

        let mut active: subscriptions::ActiveModel = subscription.clone().into();
        active.invoice_id = Set(Some(invoice.id));
        let subscription = active.update(&txn).await?;

        // used-style debit referencing the subscription.
        ledger_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            wallet_id: Set(wallet.id),
            issued: Set(Decimal::ZERO),
            used: Set(order.price),
            status: Set(EntryStatus::Posted),
            description: Set("wallet_withdraw_transaction_for_subscription".to_string()),
            order_kind: Set(OrderRefKind::Subscription),
            order_id: Set(Some(subscription.id)),
            deposit_method: Set(DepositMethod::Direct),
            reference: Set(None),
            bank: Set(None),
            account_number: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let balance_after = WalletRepository::refresh_balance_in(&txn, wallet.id).await?;
        txn.commit().await?;

        // Best-effort: match open inbound payments against the invoice.
        // The subscription and invoice stand even if this fails.
        self.reconcile_open_payments(contact.id, invoice.id)
            .await
            .map_err(|e| SubscriptionRepoError::ReconciliationFailed(e.to_string()))?;

        Ok(SubscriptionOutcome {
            subscription,
            invoice,
            balance_after,
        })
    }

    /// Marks the invoice and the contact's open posted inbound payments as
    /// reconciled.
    async fn reconcile_open_payments(
        &self,
        contact_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<(), DbErr> {
        let open_payments = accounting_documents::Entity::find()
            .filter(accounting_documents::Column::PartnerId.eq(contact_id))
            .filter(accounting_documents::Column::Kind.eq(DocumentKind::Payment))
            .filter(accounting_documents::Column::State.eq(DocumentState::Posted))
            .filter(accounting_documents::Column::Direction.eq(PaymentDirection::Inbound))
            .filter(accounting_documents::Column::Reconciled.eq(false))
            .all(&self.db)
            .await?;

        for payment in open_payments {
            let mut active: accounting_documents::ActiveModel = payment.into();
            active.reconciled = Set(true);
            active.update(&self.db).await?;
        }

        if let Some(invoice) = accounting_documents::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await?
        {
            let mut active: accounting_documents::ActiveModel = invoice.into();
            active.reconciled = Set(true);
            active.update(&self.db).await?;
        }

        Ok(())
    }
}
