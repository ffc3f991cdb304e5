use sea_orm::entity::prelude::*;

use super::enums::{Role, UserStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Bearer token (64-char hex string), minted on login
    pub api_token: Option<String>,

    pub role: Role,

    pub department: Option<String>,

    pub status: UserStatus,

    /// "Reports to" self-relation; cycle-checked at write time.
    pub manager_id: Option<i32>,

    pub created_at: DateTimeUtc,

    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id",
        on_delete = "NoAction"
    )]
    Manager,
}

impl ActiveModelBehavior for ActiveModel {}
