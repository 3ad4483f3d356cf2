//! `SeaORM` entity for the accounting_documents table.
//!
//! One row per invoice, credit note, payment, or transfer entry. Priced
//! invoice lines and transfer legs live in `document_lines`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DocumentKind, DocumentState, PaymentDirection};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub kind: DocumentKind,
    pub state: DocumentState,
    pub partner_id: Option<Uuid>,
    pub journal_id: Option<Uuid>,
    /// Total amount; always unsigned (payments carry a direction).
    pub amount: Decimal,
    pub direction: Option<PaymentDirection>,
    /// External transaction id from the ride platform (payments).
    pub transaction_id: Option<String>,
    pub reference: Option<String>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
    pub image_url: Option<String>,
    pub decline_reason: Option<String>,
    /// Whether the platform has been told about the final state.
    pub platform_synced: bool,
    /// Whether an inbound payment has been matched against an invoice.
    pub reconciled: bool,
    pub created_at: DateTimeWithTimeZone,
    pub posted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_lines::Entity")]
    DocumentLines,
}

impl Related<super::document_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
