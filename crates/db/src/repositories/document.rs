//! Accounting document factory and store.
//!
//! Creates the three document shapes the wallet ledger needs: commission/
//! fine invoices and credit notes, inbound/outbound payments against a
//! bank/cash-type journal, and balanced two-line transfer entries. Company
//! configuration (products, journals, accounts) is resolved here; missing
//! setup surfaces as a configuration error, never as user input error.
//!
//! Creation methods take the caller's open database transaction so the
//! document and the ledger entry referencing it commit atomically.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use farebox_core::documents::{
    CreditNoteSpec, InvoiceSpec, PaymentSpec, ProductKind, TransferSpec,
};
use farebox_shared::AppError;

use crate::entities::{
    accounting_documents, accounts, companies, contacts, document_lines, journals,
    sea_orm_active_enums::{
        AccountType, DocumentKind, DocumentState, JournalSubType, JournalType,
    },
};

/// Error types for document operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Missing operator configuration.
    #[error("{0}")]
    Configuration(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Configuration(m) => Self::Configuration(m),
            DocumentError::NotFound(id) => Self::NotFound(format!("Document not found: {id}")),
            DocumentError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Accounting document repository.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    db: DatabaseConnection,
}

impl DocumentRepository {
    /// Creates a new document repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a payment document by its external transaction id.
    pub async fn find_payment_by_transaction_id(
        &self,
        company_id: Uuid,
        transaction_id: &str,
    ) -> Result<Option<accounting_documents::Model>, DocumentError> {
        let document = accounting_documents::Entity::find()
            .filter(accounting_documents::Column::CompanyId.eq(company_id))
            .filter(accounting_documents::Column::TransactionId.eq(transaction_id))
            .filter(accounting_documents::Column::Kind.eq(DocumentKind::Payment))
            .one(&self.db)
            .await?;
        Ok(document)
    }

    /// Records that the platform acknowledged this document's final state.
    pub async fn mark_platform_synced(&self, document_id: Uuid) -> Result<(), DocumentError> {
        let Some(document) = accounting_documents::Entity::find_by_id(document_id)
            .one(&self.db)
            .await?
        else {
            return Err(DocumentError::NotFound(document_id));
        };
        let mut active: accounting_documents::ActiveModel = document.into();
        active.platform_synced = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Creates and posts a commission/fine invoice from its spec.
    pub async fn create_invoice_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        spec: &InvoiceSpec,
        journal_override: Option<Uuid>,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let journal_id = match journal_override {
            Some(id) => id,
            None => Self::resolve_invoice_journal(conn, company).await?,
        };

        let document = accounting_documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company.id),
            kind: Set(DocumentKind::Invoice),
            state: Set(DocumentState::Posted),
            partner_id: Set(Some(spec.partner.into_inner())),
            journal_id: Set(Some(journal_id)),
            amount: Set(spec.total()),
            direction: Set(None),
            transaction_id: Set(None),
            reference: Set(None),
            bank: Set(None),
            account_number: Set(None),
            image_url: Set(None),
            decline_reason: Set(None),
            platform_synced: Set(false),
            reconciled: Set(false),
            created_at: Set(Utc::now().into()),
            posted_at: Set(Some(Utc::now().into())),
        }
        .insert(conn)
        .await?;

        for line in &spec.lines {
            let product_id = Self::resolve_product(company, line.product)?;
            document_lines::ActiveModel {
                id: Set(Uuid::now_v7()),
                document_id: Set(document.id),
                label: Set(line.label.clone()),
                partner_id: Set(None),
                account_id: Set(None),
                product_id: Set(Some(product_id)),
                price_unit: Set(line.amount),
                debit: Set(rust_decimal::Decimal::ZERO),
                credit: Set(rust_decimal::Decimal::ZERO),
            }
            .insert(conn)
            .await?;
        }

        Ok(document)
    }

    /// Creates and posts a customer credit note (welcome coupon / points).
    pub async fn create_credit_note_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        spec: &CreditNoteSpec,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let product_id = Self::resolve_product(company, spec.line.product)?;
        let expense_account_id =
            Self::resolve_expense_account(conn, company, product_id).await?;

        let document = accounting_documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company.id),
            kind: Set(DocumentKind::CreditNote),
            state: Set(DocumentState::Posted),
            partner_id: Set(Some(spec.partner.into_inner())),
            journal_id: Set(None),
            amount: Set(spec.line.amount),
            direction: Set(None),
            transaction_id: Set(None),
            reference: Set(None),
            bank: Set(None),
            account_number: Set(None),
            image_url: Set(None),
            decline_reason: Set(None),
            platform_synced: Set(false),
            reconciled: Set(false),
            created_at: Set(Utc::now().into()),
            posted_at: Set(Some(Utc::now().into())),
        }
        .insert(conn)
        .await?;

        document_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            document_id: Set(document.id),
            label: Set(spec.line.label.clone()),
            partner_id: Set(None),
            account_id: Set(Some(expense_account_id)),
            product_id: Set(Some(product_id)),
            price_unit: Set(spec.line.amount),
            debit: Set(rust_decimal::Decimal::ZERO),
            credit: Set(rust_decimal::Decimal::ZERO),
        }
        .insert(conn)
        .await?;

        Ok(document)
    }

    /// Creates a payment record; posts it only when the spec says so.
    pub async fn create_payment_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        spec: &PaymentSpec,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let sub_type = JournalSubType::from(spec.method);
        let journal = journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company.id))
            .filter(journals::Column::SubType.eq(sub_type))
            .one(conn)
            .await?
            .ok_or_else(|| {
                DocumentError::Configuration(format!("No journal found for {}", spec.method))
            })?;

        let (state, posted_at) = if spec.post_immediately {
            (DocumentState::Posted, Some(Utc::now().into()))
        } else {
            (DocumentState::Draft, None)
        };

        let document = accounting_documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company.id),
            kind: Set(DocumentKind::Payment),
            state: Set(state),
            partner_id: Set(Some(spec.partner.into_inner())),
            journal_id: Set(Some(journal.id)),
            amount: Set(spec.absolute_amount()),
            direction: Set(Some(spec.direction().into())),
            transaction_id: Set(spec.transaction_id.clone()),
            reference: Set(Some(spec.reference.clone())),
            bank: Set(spec.bank.clone()),
            account_number: Set(spec.account_number.clone()),
            image_url: Set(spec.image_url.clone()),
            decline_reason: Set(None),
            platform_synced: Set(false),
            reconciled: Set(false),
            created_at: Set(Utc::now().into()),
            posted_at: Set(posted_at),
        }
        .insert(conn)
        .await?;

        Ok(document)
    }

    /// Creates and posts a balanced two-line transfer entry.
    ///
    /// Debits the receiving party's receivable account and credits the
    /// paying party's receivable account against the company general
    /// journal.
    pub async fn create_transfer_entry_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        spec: &TransferSpec,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let paying = Self::load_contact(conn, spec.paying.into_inner()).await?;
        let receiving = Self::load_contact(conn, spec.receiving.into_inner()).await?;

        let paying_account = Self::resolve_receivable_account(conn, company, &paying).await?;
        let receiving_account =
            Self::resolve_receivable_account(conn, company, &receiving).await?;

        let journal = Self::resolve_general_journal(conn, company).await?;

        let document = accounting_documents::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company.id),
            kind: Set(DocumentKind::TransferEntry),
            state: Set(DocumentState::Posted),
            partner_id: Set(None),
            journal_id: Set(Some(journal)),
            amount: Set(spec.amount),
            direction: Set(None),
            transaction_id: Set(None),
            reference: Set(Some(spec.reference.clone())),
            bank: Set(None),
            account_number: Set(None),
            image_url: Set(None),
            decline_reason: Set(None),
            platform_synced: Set(false),
            reconciled: Set(false),
            created_at: Set(Utc::now().into()),
            posted_at: Set(Some(Utc::now().into())),
        }
        .insert(conn)
        .await?;

        document_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            document_id: Set(document.id),
            label: Set(spec.reference.clone()),
            partner_id: Set(Some(receiving.id)),
            account_id: Set(Some(receiving_account)),
            product_id: Set(None),
            price_unit: Set(rust_decimal::Decimal::ZERO),
            debit: Set(spec.amount),
            credit: Set(rust_decimal::Decimal::ZERO),
        }
        .insert(conn)
        .await?;

        document_lines::ActiveModel {
            id: Set(Uuid::now_v7()),
            document_id: Set(document.id),
            label: Set(spec.reference.clone()),
            partner_id: Set(Some(paying.id)),
            account_id: Set(Some(paying_account)),
            product_id: Set(None),
            price_unit: Set(rust_decimal::Decimal::ZERO),
            debit: Set(rust_decimal::Decimal::ZERO),
            credit: Set(spec.amount),
        }
        .insert(conn)
        .await?;

        Ok(document)
    }

    /// Posts a draft payment.
    pub async fn post_payment_in<C: ConnectionTrait>(
        conn: &C,
        document: accounting_documents::Model,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let mut active: accounting_documents::ActiveModel = document.into();
        active.state = Set(DocumentState::Posted);
        active.posted_at = Set(Some(Utc::now().into()));
        Ok(active.update(conn).await?)
    }

    /// Cancels a draft payment with a decline reason.
    pub async fn cancel_payment_in<C: ConnectionTrait>(
        conn: &C,
        document: accounting_documents::Model,
        reason: Option<String>,
    ) -> Result<accounting_documents::Model, DocumentError> {
        let mut active: accounting_documents::ActiveModel = document.into();
        active.state = Set(DocumentState::Cancelled);
        active.decline_reason = Set(reason);
        Ok(active.update(conn).await?)
    }

    async fn load_contact<C: ConnectionTrait>(
        conn: &C,
        contact_id: Uuid,
    ) -> Result<contacts::Model, DocumentError> {
        contacts::Entity::find_by_id(contact_id)
            .one(conn)
            .await?
            .ok_or(DocumentError::NotFound(contact_id))
    }

    fn resolve_product(
        company: &companies::Model,
        kind: ProductKind,
    ) -> Result<Uuid, DocumentError> {
        let (configured, missing) = match kind {
            ProductKind::Commission => (
                company.commission_product_id,
                "Please set commission product in the settings",
            ),
            ProductKind::Fine => (
                company.fine_product_id,
                "Please set fine product in the settings",
            ),
            ProductKind::Coupon => (
                company.coupon_product_id,
                "Please set coupon product in the settings",
            ),
            ProductKind::Points => (
                company.points_product_id,
                "Please set points product in the settings",
            ),
            ProductKind::Subscription => (
                company.subscription_product_id,
                "Please set subscription product in the settings",
            ),
        };
        configured.ok_or_else(|| DocumentError::Configuration(missing.to_string()))
    }

    /// Expense account for a credited product: the product's own expense
    /// account, else any expense-type account in the company.
    async fn resolve_expense_account<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        product_id: Uuid,
    ) -> Result<Uuid, DocumentError> {
        let product = crate::entities::products::Entity::find_by_id(product_id)
            .one(conn)
            .await?;
        if let Some(account_id) = product.and_then(|p| p.expense_account_id) {
            return Ok(account_id);
        }

        accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company.id))
            .filter(accounts::Column::AccountType.eq(AccountType::Expense))
            .one(conn)
            .await?
            .map(|a| a.id)
            .ok_or_else(|| {
                DocumentError::Configuration(
                    "No expense account configured for credit notes".to_string(),
                )
            })
    }

    /// Receivable account for a party: the contact's own account, else any
    /// receivable-type account in the company.
    async fn resolve_receivable_account<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        contact: &contacts::Model,
    ) -> Result<Uuid, DocumentError> {
        if let Some(account_id) = contact.receivable_account_id {
            return Ok(account_id);
        }

        accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company.id))
            .filter(accounts::Column::AccountType.eq(AccountType::Receivable))
            .one(conn)
            .await?
            .map(|a| a.id)
            .ok_or_else(|| {
                DocumentError::Configuration(format!("{} has no receivable account", contact.name))
            })
    }

    /// Journal for sales invoices: the configured wallet journal, else any
    /// sale journal.
    async fn resolve_invoice_journal<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
    ) -> Result<Uuid, DocumentError> {
        if let Some(journal_id) = company.wallet_journal_id {
            return Ok(journal_id);
        }

        journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company.id))
            .filter(journals::Column::JournalType.eq(JournalType::Sale))
            .one(conn)
            .await?
            .map(|j| j.id)
            .ok_or_else(|| {
                DocumentError::Configuration(
                    "No general journal found to post wallet accounting entries".to_string(),
                )
            })
    }

    /// Journal for transfer entries: any general journal in the company.
    async fn resolve_general_journal<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
    ) -> Result<Uuid, DocumentError> {
        journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company.id))
            .filter(journals::Column::JournalType.eq(JournalType::General))
            .one(conn)
            .await?
            .map(|j| j.id)
            .ok_or_else(|| {
                DocumentError::Configuration(
                    "No journal found to post wallet transfer entries".to_string(),
                )
            })
    }

    /// Journal for subscription invoices: a journal flagged for
    /// subscriptions, else the configured one via `resolve_invoice_journal`.
    pub async fn resolve_subscription_journal_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
    ) -> Result<Uuid, DocumentError> {
        let flagged = journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company.id))
            .filter(journals::Column::JournalType.eq(JournalType::Sale))
            .filter(journals::Column::UsedForSubscriptions.eq(true))
            .one(conn)
            .await?;
        match flagged {
            Some(journal) => Ok(journal.id),
            None => Self::resolve_invoice_journal(conn, company).await,
        }
    }
}
