use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Weight and storage allowances granted to a move.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entitlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub move_id: Uuid,

    /// Authorized weight derived from the move's approved shipments.
    pub db_authorized_weight: Option<i32>,

    /// Total weight allowance in pounds.
    pub total_weight_allowance: Option<i32>,

    /// Base storage-in-transit days before any extension.
    pub storage_in_transit: Option<i32>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::move_task_order::Entity",
        from = "Column::MoveId",
        to = "super::move_task_order::Column::Id",
        on_delete = "Cascade"
    )]
    Move,
}

impl Related<super::move_task_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Move.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
