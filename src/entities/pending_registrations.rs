use sea_orm::entity::prelude::*;
use serde::Serialize;

use super::enums::{RegistrationStatus, Role};

/// Self-service account application awaiting admin disposition. Immutable
/// after processing except for administrative deletion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "pending_registrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub email: String,

    // Never leaves the server
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    pub department: String,

    pub status: RegistrationStatus,

    pub applied_at: DateTimeUtc,

    pub processed_at: Option<DateTimeUtc>,

    pub processed_by: Option<i32>,

    pub rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProcessedBy",
        to = "super::users::Column::Id",
        on_delete = "NoAction"
    )]
    Processor,
}

impl ActiveModelBehavior for ActiveModel {}
