//! Ride repository: find-or-create rides and execute settlements.
//!
//! Settlement for a ride id is serialized by locking the ride row; the
//! rider and driver wallet rows are locked next so every ledger effect of
//! the plan commits atomically. The draft → paid transition is terminal.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use farebox_core::documents::TransferSpec;
use farebox_core::settlement::{
    Party, Penalty, PaymentMode, SettlementCase, SettlementPlan, SettlementStep, WalletDeltas,
    aggregate,
};
use farebox_core::wallet::{
    DepositRequest, DocumentRef, EntryStatus as CoreEntryStatus, WithdrawRequest,
    ensure_balance_covers,
};
use farebox_shared::AppError;
use farebox_shared::types::{ContactId, DocumentId, RequestContext};

use super::company::{CompanyError, CompanyRepository};
use super::document::{DocumentError, DocumentRepository};
use super::wallet::{WalletError, WalletRepository};
use crate::entities::{
    companies, contacts, rides,
    sea_orm_active_enums::RideState,
    wallets,
};

/// Error types for ride settlement.
#[derive(Debug, thiserror::Error)]
pub enum RideError {
    /// Rider contact not found in this company.
    #[error("Rider not found")]
    RiderNotFound,

    /// Driver contact not found in this company.
    #[error("Driver not found")]
    DriverNotFound,

    /// Rider has no wallet.
    #[error("Wallet not found for rider")]
    RiderWalletNotFound,

    /// Driver has no wallet.
    #[error("Wallet not found for driver")]
    DriverWalletNotFound,

    /// Settlement is terminal; the ride was already paid.
    #[error("Ride already paid")]
    AlreadyPaid,

    /// The rider's posted balance does not cover the wallet portion.
    #[error("Insufficient wallet balance")]
    InsufficientBalance,

    /// Invalid transfer spec (non-positive wallet amount).
    #[error("{0}")]
    InvalidTransfer(String),

    /// Wallet operation error.
    #[error(transparent)]
    Wallet(#[from] WalletError),

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

impl From<RideError> for AppError {
    fn from(e: RideError) -> Self {
        match e {
            RideError::RiderNotFound
            | RideError::DriverNotFound
            | RideError::RiderWalletNotFound
            | RideError::DriverWalletNotFound => Self::NotFound(e.to_string()),
            RideError::AlreadyPaid => Self::Conflict(e.to_string()),
            RideError::InsufficientBalance => Self::InsufficientBalance,
            RideError::InvalidTransfer(m) => Self::Internal(m),
            RideError::Wallet(e) => e.into(),
            RideError::Document(e) => e.into(),
            RideError::Company(e) => e.into(),
            RideError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for settling one ride.
#[derive(Debug, Clone)]
pub struct SettleRideInput {
    /// External ride id; unique per company.
    pub external_id: String,
    /// Rider contact id.
    pub rider_id: Uuid,
    /// Driver contact id.
    pub driver_id: Uuid,
    /// Fare amount.
    pub fare_amount: Decimal,
    /// Wallet portion of the fare.
    pub wallet_paid: Decimal,
    /// Cash handed to the driver.
    pub cash_paid: Decimal,
    /// Platform commission.
    pub commission_amount: Decimal,
    /// Raw penalty items.
    pub penalties: Vec<Penalty>,
    /// Payment mode.
    pub mode: PaymentMode,
}

/// Result of a settlement.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    /// External ride id.
    pub ride_id: String,
    /// Case tag.
    pub case: SettlementCase,
    /// Reported net wallet deltas.
    pub deltas: WalletDeltas,
    /// Commission amount charged.
    pub commission_amount: Decimal,
    /// Whether a commission amount was invoiced.
    pub commission_invoiced: bool,
    /// Whether any penalty was applied.
    pub penalties_applied: bool,
}

/// Ride repository.
#[derive(Debug, Clone)]
pub struct RideRepository {
    db: DatabaseConnection,
}

struct SettlementParties<'a> {
    company: &'a companies::Model,
    rider: &'a contacts::Model,
    driver: &'a contacts::Model,
    rider_wallet: &'a wallets::Model,
    driver_wallet: &'a wallets::Model,
}

impl SettlementParties<'_> {
    fn wallet_of(&self, party: Party) -> Uuid {
        match party {
            Party::Rider => self.rider_wallet.id,
            Party::Driver => self.driver_wallet.id,
        }
    }

    fn contact_of(&self, party: Party) -> ContactId {
        match party {
            Party::Rider => ContactId::from_uuid(self.rider.id),
            Party::Driver => ContactId::from_uuid(self.driver.id),
        }
    }
}

impl RideRepository {
    /// Creates a new ride repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Settles a ride: finds or creates it, executes the mode's plan, and
    /// marks it paid. Re-settlement of a paid ride is rejected.
    pub async fn settle(
        &self,
        ctx: &RequestContext,
        input: SettleRideInput,
    ) -> Result<SettlementOutcome, RideError> {
        let txn = self.db.begin().await?;
        let company = CompanyRepository::load_in(&txn, ctx.company_id.into_inner()).await?;

        let rider = Self::find_contact_in(&txn, &company, input.rider_id)
            .await?
            .ok_or(RideError::RiderNotFound)?;
        let driver = Self::find_contact_in(&txn, &company, input.driver_id)
            .await?
            .ok_or(RideError::DriverNotFound)?;

        // Lock ordering: ride row first, then rider wallet, then driver
        // wallet.
        let ride = Self::find_or_create_ride_in(&txn, &company, &input, &rider, &driver).await?;
        if ride.state == RideState::Paid {
            return Err(RideError::AlreadyPaid);
        }

        let rider_wallet = WalletRepository::lock_wallet_by_contact_in(&txn, rider.id)
            .await
            .map_err(|e| match e {
                WalletError::NotFound => RideError::RiderWalletNotFound,
                other => RideError::Wallet(other),
            })?;
        let driver_wallet = WalletRepository::lock_wallet_by_contact_in(&txn, driver.id)
            .await
            .map_err(|e| match e {
                WalletError::NotFound => RideError::DriverWalletNotFound,
                other => RideError::Wallet(other),
            })?;

        let facts = farebox_core::settlement::RideFacts {
            ride_ref: input.external_id.clone(),
            fare_amount: input.fare_amount,
            wallet_paid: input.wallet_paid,
            cash_paid: input.cash_paid,
            commission_amount: input.commission_amount,
            mode: input.mode,
            penalties: aggregate(&input.penalties),
        };
        let plan = SettlementPlan::for_ride(&facts);

        let parties = SettlementParties {
            company: &company,
            rider: &rider,
            driver: &driver,
            rider_wallet: &rider_wallet,
            driver_wallet: &driver_wallet,
        };

        // Guarded legs are checked before any document exists so an
        // insufficient balance leaves zero side effects.
        Self::check_guarded_steps(&txn, &plan, &parties).await?;

        for step in &plan.steps {
            Self::execute_step_in(&txn, &parties, &input.external_id, step).await?;
        }

        let mut active: rides::ActiveModel = ride.into();
        active.fare_amount = Set(input.fare_amount);
        active.wallet_paid = Set(input.wallet_paid);
        active.cash_paid = Set(input.cash_paid);
        active.commission_amount = Set(input.commission_amount);
        active.payment_mode = Set(Some(input.mode.into()));
        active.state = Set(RideState::Paid);
        active.paid_at = Set(Some(Utc::now().into()));
        active.update(&txn).await?;

        txn.commit().await?;
        info!(
            ride_id = %input.external_id,
            case = %plan.case,
            rider_delta = %plan.deltas.rider,
            driver_delta = %plan.deltas.driver,
            "Ride settled"
        );

        Ok(SettlementOutcome {
            ride_id: input.external_id,
            case: plan.case,
            deltas: plan.deltas,
            commission_amount: input.commission_amount,
            commission_invoiced: plan.commission_invoiced,
            penalties_applied: plan.penalties_applied,
        })
    }

    async fn check_guarded_steps<C: ConnectionTrait>(
        conn: &C,
        plan: &SettlementPlan,
        parties: &SettlementParties<'_>,
    ) -> Result<(), RideError> {
        let mut guarded_rider = Decimal::ZERO;
        let mut guarded_driver = Decimal::ZERO;
        for step in &plan.steps {
            let leg = match step {
                SettlementStep::Withdraw(w) if w.guard_balance => Some(w),
                SettlementStep::WalletTransfer { rider_leg, .. } if rider_leg.guard_balance => {
                    Some(rider_leg)
                }
                _ => None,
            };
            if let Some(leg) = leg {
                match leg.party {
                    Party::Rider => guarded_rider += leg.amount,
                    Party::Driver => guarded_driver += leg.amount,
                }
            }
        }

        if guarded_rider > Decimal::ZERO {
            let balance =
                WalletRepository::posted_balance_in(conn, parties.rider_wallet.id).await?;
            ensure_balance_covers(balance, guarded_rider)
                .map_err(|_| RideError::InsufficientBalance)?;
        }
        if guarded_driver > Decimal::ZERO {
            let balance =
                WalletRepository::posted_balance_in(conn, parties.driver_wallet.id).await?;
            ensure_balance_covers(balance, guarded_driver)
                .map_err(|_| RideError::InsufficientBalance)?;
        }
        Ok(())
    }

    async fn execute_step_in<C: ConnectionTrait>(
        conn: &C,
        parties: &SettlementParties<'_>,
        ride_ref: &str,
        step: &SettlementStep,
    ) -> Result<(), RideError> {
        match step {
            SettlementStep::Withdraw(w) => {
                let request = WithdrawRequest {
                    amount: w.amount,
                    commission_amount: w.commission_amount,
                    fine_amount: w.fine_amount,
                    description: w.description.clone(),
                    status: CoreEntryStatus::Posted,
                    payer: parties.contact_of(w.party),
                    create_invoice: w.with_invoice,
                    fallback_document: DocumentRef::Contact(parties.contact_of(w.party)),
                };
                WalletRepository::withdraw_in(
                    conn,
                    parties.company,
                    parties.wallet_of(w.party),
                    &request,
                    false,
                )
                .await?;
            }
            SettlementStep::Deposit(d) => {
                let request = DepositRequest::direct(
                    d.amount,
                    d.description.clone(),
                    parties.contact_of(d.party),
                    d.with_payment,
                );
                WalletRepository::deposit_in(
                    conn,
                    parties.company,
                    parties.wallet_of(d.party),
                    &request,
                )
                .await?;
            }
            SettlementStep::WalletTransfer {
                amount,
                rider_leg,
                driver_leg,
            } => {
                let spec = TransferSpec::new(
                    parties.contact_of(Party::Rider),
                    parties.contact_of(Party::Driver),
                    *amount,
                    format!("Ride {ride_ref} wallet transfer"),
                )
                .map_err(|e| RideError::InvalidTransfer(e.to_string()))?;
                let transfer =
                    DocumentRepository::create_transfer_entry_in(conn, parties.company, &spec)
                        .await?;
                let transfer_ref =
                    DocumentRef::TransferEntry(DocumentId::from_uuid(transfer.id));

                let withdraw = WithdrawRequest {
                    amount: rider_leg.amount,
                    commission_amount: rider_leg.commission_amount,
                    fine_amount: rider_leg.fine_amount,
                    description: rider_leg.description.clone(),
                    status: CoreEntryStatus::Posted,
                    payer: parties.contact_of(Party::Rider),
                    create_invoice: false,
                    fallback_document: transfer_ref,
                };
                WalletRepository::withdraw_in(
                    conn,
                    parties.company,
                    parties.wallet_of(Party::Rider),
                    &withdraw,
                    false,
                )
                .await?;

                let deposit = DepositRequest {
                    amount: driver_leg.amount,
                    description: driver_leg.description.clone(),
                    status: CoreEntryStatus::Posted,
                    payer: parties.contact_of(Party::Driver),
                    create_payment: false,
                    fallback_document: transfer_ref,
                    deposit_method: farebox_core::wallet::DepositMethod::Direct,
                    reference: None,
                    bank: None,
                    account_number: None,
                };
                WalletRepository::deposit_in(
                    conn,
                    parties.company,
                    parties.wallet_of(Party::Driver),
                    &deposit,
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn find_contact_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        contact_id: Uuid,
    ) -> Result<Option<contacts::Model>, DbErr> {
        Ok(contacts::Entity::find_by_id(contact_id)
            .one(conn)
            .await?
            .filter(|c| c.company_id == company.id))
    }

    async fn find_or_create_ride_in<C: ConnectionTrait>(
        conn: &C,
        company: &companies::Model,
        input: &SettleRideInput,
        rider: &contacts::Model,
        driver: &contacts::Model,
    ) -> Result<rides::Model, RideError> {
        let existing = rides::Entity::find()
            .filter(rides::Column::CompanyId.eq(company.id))
            .filter(rides::Column::ExternalId.eq(input.external_id.clone()))
            .lock_exclusive()
            .one(conn)
            .await?;
        if let Some(ride) = existing {
            return Ok(ride);
        }

        let ride = rides::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(company.id),
            external_id: Set(input.external_id.clone()),
            rider_id: Set(rider.id),
            driver_id: Set(driver.id),
            fare_amount: Set(input.fare_amount),
            wallet_paid: Set(input.wallet_paid),
            cash_paid: Set(input.cash_paid),
            commission_amount: Set(input.commission_amount),
            payment_mode: Set(None),
            state: Set(RideState::Draft),
            paid_at: Set(None),
            created_at: Set(Utc::now().into()),
        }
        .insert(conn)
        .await?;
        Ok(ride)
    }
}
