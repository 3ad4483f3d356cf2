//! `SeaORM` entity for the rides table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMode, RideState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "rides")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    /// External ride id; unique per company.
    pub external_id: String,
    pub rider_id: Uuid,
    pub driver_id: Uuid,
    pub fare_amount: Decimal,
    pub wallet_paid: Decimal,
    pub cash_paid: Decimal,
    pub commission_amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    pub state: RideState,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::RiderId",
        to = "super::contacts::Column::Id"
    )]
    Rider,
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::DriverId",
        to = "super::contacts::Column::Id"
    )]
    Driver,
}

impl ActiveModelBehavior for ActiveModel {}
