//! `SeaORM` entity for the document_lines table.
//!
//! Shared by invoices (priced product lines) and transfer entries
//! (debit/credit legs against the parties' receivable accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub label: String,
    pub partner_id: Option<Uuid>,
    pub account_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    /// Unit price for invoice lines (quantity is always 1).
    pub price_unit: Decimal,
    /// Debit amount for transfer legs.
    pub debit: Decimal,
    /// Credit amount for transfer legs.
    pub credit: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounting_documents::Entity",
        from = "Column::DocumentId",
        to = "super::accounting_documents::Column::Id"
    )]
    AccountingDocuments,
}

impl Related<super::accounting_documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountingDocuments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
