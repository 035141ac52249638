use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "volunteer_application")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// NULL for applications submitted without an account.
    pub user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<Option<super::user::Entity>>,

    pub name: String,
    pub email: String,
    pub phone: String,

    /// Organizing team applied for. One of: media, logistics, ops, volunteers.
    pub team: String,

    pub experience: String,
    pub availability: String,
    pub motivation: String,

    /// One of: pending, approved, rejected.
    pub status: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
