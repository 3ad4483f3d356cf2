//! Wallet transaction routes: top-ups, withdrawals, and bank-transfer
//! confirmation.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{AppState, middleware::ApiContext, respond};
use farebox_core::documents::PaymentMethodType;
use farebox_core::wallet::DepositMethod;
use farebox_db::DocumentRepository;
use farebox_db::repositories::wallet::{
    AddWalletTransactionInput, ConfirmTransactionInput, TopUpMethod, WalletRepository,
    WalletWithdrawInput,
};
use farebox_shared::{AppError, TransactionOutcome, TransactionStatusUpdate};

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add_wallet_transaction", post(add_wallet_transaction))
        .route("/wallet_withdraw", post(wallet_withdraw))
        .route(
            "/confirm_wallet_transaction",
            post(confirm_wallet_transaction),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for crediting a wallet.
#[derive(Debug, Deserialize)]
pub struct AddWalletTransactionRequest {
    /// Contact id.
    pub partner_id: Option<Uuid>,
    /// External transaction id.
    pub transaction_id: Option<String>,
    /// "points", or a journal sub-type: "bank", "fund", "cash", "tele".
    pub payment_method_type: Option<String>,
    /// "direct" or "bank_transfer".
    pub transaction_type: Option<String>,
    /// Amount; must be greater than 0.
    pub amount: Option<Decimal>,
    /// External reference.
    pub reference: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Bank notification image URL.
    pub image_url: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
}

/// Request body for a wallet withdrawal.
#[derive(Debug, Deserialize)]
pub struct WalletWithdrawRequest {
    /// Contact id.
    pub partner_id: Option<Uuid>,
    /// Amount; must be greater than 0.
    pub amount: Option<Decimal>,
    /// External transaction id.
    pub transaction_id: Option<String>,
    /// Bank name.
    pub bank: Option<String>,
    /// Customer bank account number.
    pub account_number: Option<String>,
    /// Free-form note.
    pub note: Option<String>,
}

/// Request body for finalizing a pending bank transfer.
#[derive(Debug, Deserialize)]
pub struct ConfirmWalletTransactionRequest {
    /// External transaction id of the pending payment.
    pub transaction_id: Option<String>,
    /// "confirm" or "decline".
    pub action: Option<String>,
    /// Reason recorded when declining.
    pub decline_reason: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/api/add_wallet_transaction` - Credit a wallet from a top-up.
async fn add_wallet_transaction(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<AddWalletTransactionRequest>,
) -> impl IntoResponse {
    let Some(partner_id) = request.partner_id else {
        return respond::validation("partner_id is required");
    };
    let Some(transaction_id) = request.transaction_id.filter(|s| !s.is_empty()) else {
        return respond::validation("transaction_id is required");
    };
    let Some(transaction_type) = request.transaction_type.as_deref() else {
        return respond::validation("transaction_type is required");
    };
    let deposit_method = match transaction_type {
        "direct" => DepositMethod::Direct,
        "bank_transfer" => DepositMethod::BankTransfer,
        _ => return respond::validation("Invalid transaction_type"),
    };
    let Some(amount) = request.amount.filter(|a| *a > Decimal::ZERO) else {
        return respond::validation("amount is required and must be greater than 0");
    };
    let method = match request.payment_method_type.as_deref() {
        None => return respond::validation("payment_method_type is required"),
        Some("points") => TopUpMethod::Points,
        Some(raw) => match PaymentMethodType::from_str(raw) {
            Ok(method) => TopUpMethod::Payment(method),
            Err(_) => return respond::validation("Invalid payment_method_type"),
        },
    };

    let input = AddWalletTransactionInput {
        contact_id: partner_id,
        transaction_id,
        method,
        deposit_method,
        amount,
        reference: request.reference,
        bank: request.bank,
        image_url: request.image_url,
        note: request.note,
        account_number: request.account_number,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.add_transaction(&ctx, input).await {
        Ok(outcome) => {
            let document = outcome.document.as_ref();
            respond::success(
                StatusCode::CREATED,
                "Wallet transaction created successfully",
                json!({
                    "transaction_id": outcome.entry.id,
                    "journal_entry_id": document.map(|d| d.id),
                    "journal_transaction_id": document.and_then(|d| d.transaction_id.clone()),
                    "partner_id": partner_id,
                    "wallet_id": outcome.entry.wallet_id,
                    "amount": outcome.entry.issued,
                    "deposit_method": transaction_type,
                    "state": outcome.entry.status,
                    "balance_after": outcome.balance_after,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to create wallet transaction");
            respond::app_error(&AppError::from(e))
        }
    }
}

/// POST `/api/wallet_withdraw` - Withdraw from a wallet.
///
/// Rejected with a 409 when the amount exceeds the posted balance; the
/// payment and ledger entry stay draft until the transfer is confirmed.
async fn wallet_withdraw(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<WalletWithdrawRequest>,
) -> impl IntoResponse {
    let Some(partner_id) = request.partner_id else {
        return respond::validation("partner_id is required");
    };
    let Some(amount) = request.amount.filter(|a| *a > Decimal::ZERO) else {
        return respond::validation("amount is required and must be greater than 0");
    };
    let Some(transaction_id) = request.transaction_id.filter(|s| !s.is_empty()) else {
        return respond::validation("transaction_id is required");
    };

    let input = WalletWithdrawInput {
        contact_id: partner_id,
        amount,
        transaction_id,
        bank: request.bank,
        account_number: request.account_number,
        note: request.note,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.withdraw_transaction(&ctx, input).await {
        Ok(outcome) => respond::success(
            StatusCode::CREATED,
            "Withdrawal transaction created successfully",
            json!({
                "transaction_id": outcome.entry.id,
                "journal_entry_id": outcome.document.id,
                "net_amount": outcome.net_amount,
                "balance_after": outcome.balance_after,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Failed to create withdrawal transaction");
            respond::app_error(&AppError::from(e))
        }
    }
}

/// POST `/api/confirm_wallet_transaction` - Finalize a pending transfer.
///
/// Confirming posts the payment and its ledger entries; declining cancels
/// the payment. Either way the platform is notified after the local commit,
/// fire-and-forget.
async fn confirm_wallet_transaction(
    State(state): State<AppState>,
    ApiContext(ctx): ApiContext,
    Json(request): Json<ConfirmWalletTransactionRequest>,
) -> impl IntoResponse {
    let Some(transaction_id) = request.transaction_id.filter(|s| !s.is_empty()) else {
        return respond::validation("transaction_id is required");
    };
    let outcome = match request.action.as_deref() {
        Some("confirm") => TransactionOutcome::Confirm,
        Some("decline") => TransactionOutcome::Decline,
        _ => return respond::validation("action must be confirm or decline"),
    };

    let input = ConfirmTransactionInput {
        transaction_id: transaction_id.clone(),
        outcome,
        decline_reason: request.decline_reason,
    };

    let repo = WalletRepository::new((*state.db).clone());
    match repo.confirm_transaction(&ctx, input).await {
        Ok(result) => {
            notify_platform(&state, &result.document, outcome);
            respond::success(
                StatusCode::OK,
                "Wallet transaction finalized successfully",
                json!({
                    "transaction_id": transaction_id,
                    "journal_entry_id": result.document.id,
                    "state": result.document.state,
                    "balance_after": result.balance_after,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to finalize wallet transaction");
            respond::app_error(&AppError::from(e))
        }
    }
}

/// Fires the platform status notification after the local commit.
///
/// Best-effort: failures are logged and never affect the response or the
/// committed document state.
fn notify_platform(
    state: &AppState,
    document: &farebox_db::entities::accounting_documents::Model,
    outcome: TransactionOutcome,
) {
    let Some(transaction_id) = document.transaction_id.clone() else {
        return;
    };

    let update = TransactionStatusUpdate {
        transaction_id,
        status: outcome,
        bank: document.bank.clone(),
        account_number: document.account_number.clone(),
        decline_reason: document.decline_reason.clone(),
    };

    let notifier = state.notifier.clone();
    let documents = DocumentRepository::new((*state.db).clone());
    let document_id = document.id;
    tokio::spawn(async move {
        match notifier.send_status_update(&update).await {
            Ok(()) => {
                if let Err(e) = documents.mark_platform_synced(document_id).await {
                    warn!(error = %e, "Failed to record platform sync");
                }
            }
            Err(e) => {
                warn!(
                    transaction_id = %update.transaction_id,
                    error = %e,
                    "Failed to sync transaction status with platform"
                );
            }
        }
    });
}
