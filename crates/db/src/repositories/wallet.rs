//! Wallet repository: the transactional ledger primitive.
//!
//! Every mutation follows the same shape: lock the wallet row, optionally
//! create the backing accounting document, append the ledger entry, then
//! recompute the posted balance and write it back, all inside one database
//! transaction so concurrent operations against the same wallet serialize.
//!
//! The cached balance is only ever written from the posted-entry
//! recomputation; draft entries never move it. The projected figure for a
//! draft withdrawal is returned to the caller but not persisted.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use farebox_core::documents::{CreditNoteSpec, InvoiceLineSpec, PaymentMethodType, PaymentSpec};
use farebox_core::wallet::{
    DepositRequest, DocumentRef, EntryStatus as CoreEntryStatus, PlannedDocument, WalletEffect,
    WithdrawRequest, ensure_balance_covers, plan_deposit, plan_withdraw, posted_balance,
    projected_balance_after,
};
use farebox_shared::types::{
    ContactId, DocumentId, LedgerEntryId, RequestContext, SubscriptionId, WalletId,
};
use farebox_shared::{AppError, TransactionOutcome};

use super::company::{CompanyError, CompanyRepository};
use super::document::{DocumentError, DocumentRepository};
use crate::entities::{
    accounting_documents, companies, contacts, ledger_entries,
    sea_orm_active_enums::{DocumentState, EntryStatus, OrderRefKind},
    wallets,
};

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Contact does not exist in this company.
    #[error("Partner not found or does not belong to this company")]
    PartnerNotFound,

    /// Contact exists but has no wallet.
    #[error("Wallet not found for this partner")]
    NotFound,

    /// Posted balance does not cover the requested amount.
    #[error("Insufficient wallet balance")]
    InsufficientBalance,

    /// A wallet transaction with this external id already exists.
    #[error("A transaction with id {0} already exists")]
    DuplicateTransaction(String),

    /// No payment with this external transaction id.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// The payment is no longer pending confirmation.
    #[error("Transaction already finalized")]
    AlreadyFinalized,

    /// Invalid document spec produced by the planner.
    #[error("Invalid document spec: {0}")]
    InvalidSpec(String),

    /// Document factory error.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Company lookup error.
    #[error(transparent)]
    Company(#[from] CompanyError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<WalletError> for AppError {
    fn from(e: WalletError) -> Self {
        match e {
            WalletError::PartnerNotFound | WalletError::NotFound => Self::NotFound(e.to_string()),
            WalletError::InsufficientBalance => Self::InsufficientBalance,
            WalletError::DuplicateTransaction(_) | WalletError::AlreadyFinalized => {
                Self::Conflict(e.to_string())
            }
            WalletError::TransactionNotFound(_) => Self::NotFound(e.to_string()),
            WalletError::InvalidSpec(m) => Self::Internal(m),
            WalletError::Document(e) => e.into(),
            WalletError::Company(e) => e.into(),
            WalletError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

fn map_core(e: farebox_core::wallet::WalletError) -> WalletError {
    match e {
        farebox_core::wallet::WalletError::InsufficientBalance { .. } => {
            WalletError::InsufficientBalance
        }
        farebox_core::wallet::WalletError::Document(d) => WalletError::InvalidSpec(d.to_string()),
    }
}

/// How a wallet top-up is documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopUpMethod {
    /// Loyalty points: a credit note instead of a payment.
    Points,
    /// A payment against the journal with this sub-type.
    Payment(PaymentMethodType),
}

/// Input for `add_transaction`.
#[derive(Debug, Clone)]
pub struct AddWalletTransactionInput {
    /// Contact whose wallet is credited.
    pub contact_id: Uuid,
    /// External transaction id from the platform.
    pub transaction_id: String,
    /// How the top-up is documented.
    pub method: TopUpMethod,
    /// Direct (posted immediately) or bank transfer (draft).
    pub deposit_method: farebox_core::wallet::DepositMethod,
    /// Amount (strictly positive, validated upstream).
    pub amount: Decimal,
    /// External reference.
    pub reference: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Bank notification image URL.
    pub image_url: Option<String>,
    /// Free-form note; becomes the entry description.
    pub note: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
}

/// Input for `withdraw_transaction`.
#[derive(Debug, Clone)]
pub struct WalletWithdrawInput {
    /// Contact whose wallet is debited.
    pub contact_id: Uuid,
    /// Amount (strictly positive, validated upstream).
    pub amount: Decimal,
    /// External transaction id from the platform.
    pub transaction_id: String,
    /// Bank name.
    pub bank: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Input for `confirm_transaction`.
#[derive(Debug, Clone)]
pub struct ConfirmTransactionInput {
    /// External transaction id of the pending payment.
    pub transaction_id: String,
    /// Confirm or decline.
    pub outcome: TransactionOutcome,
    /// Reason recorded when declining.
    pub decline_reason: Option<String>,
}

/// Result of one executed wallet operation.
#[derive(Debug, Clone)]
pub struct WalletOperationOutcome {
    /// The appended ledger entry.
    pub entry: ledger_entries::Model,
    /// The backing document, when one was created.
    pub document: Option<accounting_documents::Model>,
    /// The persisted posted balance after the operation.
    pub balance_after: Decimal,
}

/// Result of `withdraw_transaction`.
#[derive(Debug, Clone)]
pub struct WithdrawTransactionOutcome {
    /// The appended (draft) ledger entry.
    pub entry: ledger_entries::Model,
    /// The draft outbound payment.
    pub document: accounting_documents::Model,
    /// Net amount withdrawn.
    pub net_amount: Decimal,
    /// Projected balance once the withdrawal is confirmed (response-only;
    /// the persisted balance is untouched by draft entries).
    pub balance_after: Decimal,
}

/// Result of `confirm_transaction`.
#[derive(Debug, Clone)]
pub struct ConfirmTransactionOutcome {
    /// The finalized payment document.
    pub document: accounting_documents::Model,
    /// Whether the payment was confirmed or declined.
    pub outcome: TransactionOutcome,
    /// Posted balance of the affected wallet after the transition, when a
    /// ledger entry was attached to the payment.
    pub balance_after: Option<Decimal>,
}

/// Wallet repository.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Credits a wallet from an external top-up.
    ///
    /// `direct` transactions post immediately; `bank_transfer` leaves the
    /// payment and entry draft until confirmation.
    pub async fn add_transaction(
        &self,
        ctx: &RequestContext,
        input: AddWalletTransactionInput,
    ) -> Result<WalletOperationOutcome, WalletError> {
        let txn = self.db.begin().await?;
        let company = CompanyRepository::load_in(&txn, ctx.company_id.into_inner()).await?;
        let contact = Self::find_contact_in(&txn, &company, input.contact_id).await?;
        Self::ensure_new_transaction_id(&txn, &company, &input.transaction_id).await?;
        let wallet = Self::lock_wallet_by_contact_in(&txn, contact.id).await?;

        let status = match input.deposit_method {
            farebox_core::wallet::DepositMethod::Direct => CoreEntryStatus::Posted,
            farebox_core::wallet::DepositMethod::BankTransfer => CoreEntryStatus::Draft,
        };
        let description = input.note.clone().unwrap_or_default();
        let payer = ContactId::from_uuid(contact.id);

        let document = match input.method {
            TopUpMethod::Points => {
                let spec = CreditNoteSpec {
                    partner: payer,
                    line: InvoiceLineSpec::points(input.amount),
                };
                DocumentRepository::create_credit_note_in(&txn, &company, &spec).await?
            }
            TopUpMethod::Payment(method) => {
                let spec = PaymentSpec {
                    partner: payer,
                    amount: input.amount,
                    method,
                    reference: description.clone(),
                    transaction_id: Some(input.transaction_id.clone()),
                    bank: input.bank.clone(),
                    account_number: input.account_number.clone(),
                    image_url: input.image_url.clone(),
                    post_immediately: status == CoreEntryStatus::Posted,
                };
                DocumentRepository::create_payment_in(&txn, &company, &spec).await?
            }
        };

        let document_ref = match input.method {
            TopUpMethod::Points => DocumentRef::Invoice(DocumentId::from_uuid(document.id)),
            TopUpMethod::Payment(_) => DocumentRef::Payment(DocumentId::from_uuid(document.id)),
        };

        let effect = plan_deposit(&DepositRequest {
            amount: input.amount,
            description,
            status,
            payer,
            create_payment: false,
            fallback_document: document_ref,
            deposit_method: input.deposit_method,
            reference: input.reference.clone(),
            bank: input.bank.clone(),
            account_number: input.account_number.clone(),
        })
        .map_err(map_core)?;

        let (entry, _) = Self::execute_effect_in(&txn, &company, wallet.id, effect).await?;
        let balance_after = Self::refresh_balance_in(&txn, wallet.id).await?;
        txn.commit().await?;

        Ok(WalletOperationOutcome {
            entry,
            document: Some(document),
            balance_after,
        })
    }

    /// Debits a wallet for an external withdrawal request.
    ///
    /// Rejected before any document is created when the posted balance does
    /// not cover the amount. The payment and entry stay draft until the
    /// bank transfer is confirmed.
    pub async fn withdraw_transaction(
        &self,
        ctx: &RequestContext,
        input: WalletWithdrawInput,
    ) -> Result<WithdrawTransactionOutcome, WalletError> {
        let txn = self.db.begin().await?;
        let company = CompanyRepository::load_in(&txn, ctx.company_id.into_inner()).await?;
        let contact = Self::find_contact_in(&txn, &company, input.contact_id).await?;
        Self::ensure_new_transaction_id(&txn, &company, &input.transaction_id).await?;
        let wallet = Self::lock_wallet_by_contact_in(&txn, contact.id).await?;

        let balance = Self::posted_balance_in(&txn, wallet.id).await?;
        ensure_balance_covers(balance, input.amount).map_err(map_core)?;

        let note = input.note.clone().unwrap_or_default();
        let payer = ContactId::from_uuid(contact.id);
        let document = DocumentRepository::create_payment_in(
            &txn,
            &company,
            &PaymentSpec {
                partner: payer,
                amount: -input.amount,
                method: PaymentMethodType::Bank,
                reference: note.clone(),
                transaction_id: Some(input.transaction_id.clone()),
                bank: input.bank.clone(),
                account_number: input.account_number.clone(),
                image_url: None,
                post_immediately: false,
            },
        )
        .await?;

        let effect = plan_withdraw(&WithdrawRequest {
            amount: input.amount,
            commission_amount: Decimal::ZERO,
            fine_amount: Decimal::ZERO,
            description: format!("Wallet withdraw. {note}"),
            status: CoreEntryStatus::Draft,
            payer,
            create_invoice: false,
            fallback_document: DocumentRef::Payment(DocumentId::from_uuid(document.id)),
        })
        .map_err(map_core)?;

        let (entry, _) = Self::execute_effect_in(&txn, &company, wallet.id, effect).await?;
        Self::refresh_balance_in(&txn, wallet.id).await?;
        txn.commit().await?;

        Ok(WithdrawTransactionOutcome {
            entry,
            document,
            net_amount: input.amount,
            balance_after: projected_balance_after(balance, input.amount),
        })
    }

    /// Finalizes a pending bank-transfer payment.
    ///
    /// Confirming posts the payment, transitions its ledger entries
    /// draft → posted, and recomputes the affected balances. Declining
    /// cancels the payment and leaves the entries draft.
    pub async fn confirm_transaction(
        &self,
        ctx: &RequestContext,
        input: ConfirmTransactionInput,
    ) -> Result<ConfirmTransactionOutcome, WalletError> {
        let txn = self.db.begin().await?;

        let document = accounting_documents::Entity::find()
            .filter(accounting_documents::Column::CompanyId.eq(ctx.company_id.into_inner()))
            .filter(accounting_documents::Column::TransactionId.eq(input.transaction_id.clone()))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| WalletError::TransactionNotFound(input.transaction_id.clone()))?;

        if document.state != DocumentState::Draft {
            return Err(WalletError::AlreadyFinalized);
        }

        let (document, balance_after) = match input.outcome {
            TransactionOutcome::Confirm => {
                let document = DocumentRepository::post_payment_in(&txn, document).await?;
                let balance = Self::post_entries_for_document_in(&txn, document.id).await?;
                (document, balance)
            }
            TransactionOutcome::Decline => {
                let document =
                    DocumentRepository::cancel_payment_in(&txn, document, input.decline_reason)
                        .await?;
                (document, None)
            }
        };

        txn.commit().await?;
        info!(
            transaction_id = %input.transaction_id,
            outcome = ?input.outcome,
            "Wallet transaction finalized"
        );

        Ok(ConfirmTransactionOutcome {
            document,
            outcome: input.outcome,
            balance_after,
        })
    }

    /// Executes one planned wallet effect: create the backing document,
    /// append the entry, return both.
    pub(crate) async fn execute_effect_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        wallet_id: Uuid,
        effect: WalletEffect,
    ) -> Result<(ledger_entries::Model, Option<accounting_documents::Model>), WalletError> {
        let document = match &effect.document {
            PlannedDocument::None => None,
            PlannedDocument::Invoice(spec) => {
                Some(DocumentRepository::create_invoice_in(conn, company, spec, None).await?)
            }
            PlannedDocument::Payment(spec) => {
                Some(DocumentRepository::create_payment_in(conn, company, spec).await?)
            }
        };

        let document_ref = match (&effect.document, &document) {
            (PlannedDocument::Invoice(_), Some(doc)) => {
                DocumentRef::Invoice(DocumentId::from_uuid(doc.id))
            }
            (PlannedDocument::Payment(_), Some(doc)) => {
                DocumentRef::Payment(DocumentId::from_uuid(doc.id))
            }
            _ => effect.entry.fallback_document,
        };
        let (order_kind, order_id) = order_ref_parts(document_ref);

        let entry = ledger_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            wallet_id: Set(wallet_id),
            issued: Set(effect.entry.issued),
            used: Set(effect.entry.used),
            status: Set(effect.entry.status.into()),
            description: Set(effect.entry.description),
            order_kind: Set(order_kind),
            order_id: Set(order_id),
            deposit_method: Set(effect.entry.deposit_method.into()),
            reference: Set(effect.entry.reference),
            bank: Set(effect.entry.bank),
            account_number: Set(effect.entry.account_number),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(conn)
        .await?;

        Ok((entry, document))
    }

    /// Executes a withdraw inside the caller's transaction.
    pub(crate) async fn withdraw_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        wallet_id: Uuid,
        request: &WithdrawRequest,
        guard: bool,
    ) -> Result<WalletOperationOutcome, WalletError> {
        if guard {
            let balance = Self::posted_balance_in(conn, wallet_id).await?;
            ensure_balance_covers(balance, request.amount).map_err(map_core)?;
        }

        let effect = plan_withdraw(request).map_err(map_core)?;
        let (entry, document) = Self::execute_effect_in(conn, company, wallet_id, effect).await?;
        let balance_after = Self::refresh_balance_in(conn, wallet_id).await?;

        Ok(WalletOperationOutcome {
            entry,
            document,
            balance_after,
        })
    }

    /// Executes a deposit inside the caller's transaction.
    pub(crate) async fn deposit_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        wallet_id: Uuid,
        request: &DepositRequest,
    ) -> Result<WalletOperationOutcome, WalletError> {
        let effect = plan_deposit(request).map_err(map_core)?;
        let (entry, document) = Self::execute_effect_in(conn, company, wallet_id, effect).await?;
        let balance_after = Self::refresh_balance_in(conn, wallet_id).await?;

        Ok(WalletOperationOutcome {
            entry,
            document,
            balance_after,
        })
    }

    /// Derives the posted balance of a wallet from its entries.
    pub(crate) async fn posted_balance_in<C: ConnectionTrait>(
        conn: &C,
        wallet_id: Uuid,
    ) -> Result<Decimal, WalletError> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::WalletId.eq(wallet_id))
            .filter(ledger_entries::Column::Status.eq(EntryStatus::Posted))
            .all(conn)
            .await?;
        let entries: Vec<_> = entries.iter().map(to_core_entry).collect();
        Ok(posted_balance(&entries))
    }

    /// Recomputes the posted balance and writes it back to the wallet.
    pub(crate) async fn refresh_balance_in<C: ConnectionTrait>(
        conn: &C,
        wallet_id: Uuid,
    ) -> Result<Decimal, WalletError> {
        let balance = Self::posted_balance_in(conn, wallet_id).await?;
        let wallet = wallets::Entity::find_by_id(wallet_id)
            .one(conn)
            .await?
            .ok_or(WalletError::NotFound)?;
        let mut active: wallets::ActiveModel = wallet.into();
        active.balance = Set(balance);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await?;
        Ok(balance)
    }

    /// Locks a contact's wallet row for the rest of the transaction.
    pub(crate) async fn lock_wallet_by_contact_in<C: ConnectionTrait>(
        conn: &C,
        contact_id: Uuid,
    ) -> Result<wallets::Model, WalletError> {
        wallets::Entity::find()
            .filter(wallets::Column::ContactId.eq(contact_id))
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or(WalletError::NotFound)
    }

    /// Transitions the draft entries behind a posted payment and refreshes
    /// the affected wallet balances. Returns the last refreshed balance.
    async fn post_entries_for_document_in<C: ConnectionTrait>(
        conn: &C,
        document_id: Uuid,
    ) -> Result<Option<Decimal>, WalletError> {
        let entries = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::OrderKind.eq(OrderRefKind::Payment))
            .filter(ledger_entries::Column::OrderId.eq(document_id))
            .filter(ledger_entries::Column::Status.eq(EntryStatus::Draft))
            .all(conn)
            .await?;

        let mut balance_after = None;
        for entry in entries {
            let wallet_id = entry.wallet_id;
            let mut active: ledger_entries::ActiveModel = entry.into();
            active.status = Set(EntryStatus::Posted);
            active.update(conn).await?;
            balance_after = Some(Self::refresh_balance_in(conn, wallet_id).await?);
        }
        Ok(balance_after)
    }

    async fn find_contact_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        contact_id: Uuid,
    ) -> Result<contacts::Model, WalletError> {
        contacts::Entity::find_by_id(contact_id)
            .one(conn)
            .await?
            .filter(|c| c.company_id == company.id)
            .ok_or(WalletError::PartnerNotFound)
    }

    async fn ensure_new_transaction_id<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        transaction_id: &str,
    ) -> Result<(), WalletError> {
        let existing = accounting_documents::Entity::find()
            .filter(accounting_documents::Column::CompanyId.eq(company.id))
            .filter(accounting_documents::Column::TransactionId.eq(transaction_id))
            .one(conn)
            .await?;
        if existing.is_some() {
            return Err(WalletError::DuplicateTransaction(transaction_id.to_string()));
        }
        Ok(())
    }
}

/// Maps a polymorphic document reference to its storage columns.
fn order_ref_parts(document_ref: DocumentRef) -> (OrderRefKind, Option<Uuid>) {
    match document_ref {
        DocumentRef::Payment(id) => (OrderRefKind::Payment, Some(id.into_inner())),
        DocumentRef::Invoice(id) => (OrderRefKind::Invoice, Some(id.into_inner())),
        DocumentRef::TransferEntry(id) => (OrderRefKind::TransferEntry, Some(id.into_inner())),
        DocumentRef::Subscription(id) => (OrderRefKind::Subscription, Some(id.into_inner())),
        DocumentRef::Contact(id) => (OrderRefKind::Contact, Some(id.into_inner())),
        DocumentRef::None => (OrderRefKind::None, None),
    }
}

/// Maps a stored entry row to the core domain type.
fn to_core_entry(model: &ledger_entries::Model) -> farebox_core::wallet::LedgerEntry {
    let document = match (model.order_kind.clone(), model.order_id) {
        (OrderRefKind::Payment, Some(id)) => DocumentRef::Payment(DocumentId::from_uuid(id)),
        (OrderRefKind::Invoice, Some(id)) => DocumentRef::Invoice(DocumentId::from_uuid(id)),
        (OrderRefKind::TransferEntry, Some(id)) => {
            DocumentRef::TransferEntry(DocumentId::from_uuid(id))
        }
        (OrderRefKind::Subscription, Some(id)) => {
            DocumentRef::Subscription(SubscriptionId::from_uuid(id))
        }
        (OrderRefKind::Contact, Some(id)) => DocumentRef::Contact(ContactId::from_uuid(id)),
        _ => DocumentRef::None,
    };

    farebox_core::wallet::LedgerEntry {
        id: LedgerEntryId::from_uuid(model.id),
        wallet_id: WalletId::from_uuid(model.wallet_id),
        issued: model.issued,
        used: model.used,
        status: model.status.clone().into(),
        description: model.description.clone(),
        document,
        deposit_method: model.deposit_method.clone().into(),
        reference: model.reference.clone(),
        bank: model.bank.clone(),
        account_number: model.account_number.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::DepositMethod;
    use rust_decimal_macros::dec;

    fn entry_model(issued: Decimal, used: Decimal, status: EntryStatus) -> ledger_entries::Model {
        ledger_entries::Model {
            id: Uuid::now_v7(),
            wallet_id: Uuid::now_v7(),
            issued,
            used,
            status,
            description: String::new(),
            order_kind: OrderRefKind::None,
            order_id: None,
            deposit_method: DepositMethod::Direct,
            reference: None,
            bank: None,
            account_number: None,
            created_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn test_to_core_entry_maps_status_and_amounts() {
        let model = entry_model(dec!(-30), dec!(0), EntryStatus::Draft);
        let entry = to_core_entry(&model);
        assert_eq!(entry.issued, dec!(-30));
        assert_eq!(entry.status, CoreEntryStatus::Draft);
        assert_eq!(entry.document, DocumentRef::None);
    }

    #[test]
    fn test_order_ref_roundtrip() {
        let id = Uuid::now_v7();
        let (kind, stored) = order_ref_parts(DocumentRef::Payment(DocumentId::from_uuid(id)));
        assert_eq!(kind, OrderRefKind::Payment);
        assert_eq!(stored, Some(id));

        let mut model = entry_model(dec!(10), dec!(0), EntryStatus::Posted);
        model.order_kind = kind;
        model.order_id = stored;
        assert_eq!(
            to_core_entry(&model).document,
            DocumentRef::Payment(DocumentId::from_uuid(id))
        );
    }

    #[test]
    fn test_order_ref_missing_id_degrades_to_none() {
        let mut model = entry_model(dec!(10), dec!(0), EntryStatus::Posted);
        model.order_kind = OrderRefKind::Payment;
        model.order_id = None;
        assert_eq!(to_core_entry(&model).document, DocumentRef::None);
    }
}
