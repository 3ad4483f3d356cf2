//! `SeaORM` entity for the companies table.
//!
//! A company is the tenant scope and carries the operator configuration the
//! document factory resolves (products, journals, accounts).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    pub wallet_journal_id: Option<Uuid>,
    pub subscription_journal_id: Option<Uuid>,
    pub commission_product_id: Option<Uuid>,
    pub fine_product_id: Option<Uuid>,
    pub coupon_product_id: Option<Uuid>,
    pub points_product_id: Option<Uuid>,
    pub subscription_product_id: Option<Uuid>,
    pub bank_account_id: Option<Uuid>,
    pub bonus_account_id: Option<Uuid>,
    pub rider_wallet_account_id: Option<Uuid>,
    pub driver_wallet_account_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contacts::Entity")]
    Contacts,
    #[sea_orm(has_many = "super::api_keys::Entity")]
    ApiKeys,
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::api_keys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiKeys.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
