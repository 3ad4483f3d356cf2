//! `SeaORM` entity for the ledger_entries table (wallet movement history).
//!
//! Append-only: rows are created by the wallet primitives and only ever
//! mutated for the draft → posted transition when the backing payment is
//! confirmed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DepositMethod, EntryStatus, OrderRefKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub wallet_id: Uuid,
    /// Signed credit amount; negative represents a debit.
    pub issued: Decimal,
    /// Legacy debit amount; additive with the negative-issued convention.
    pub used: Decimal,
    pub status: EntryStatus,
    pub description: String,
    /// Tag of the justifying record.
    pub order_kind: OrderRefKind,
    /// Id of the justifying record, when one exists.
    pub order_id: Option<Uuid>,
    pub deposit_method: DepositMethod,
    pub reference: Option<String>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
