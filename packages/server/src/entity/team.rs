use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub university: String,
    pub coach_name: String,
    pub coach_email: String,
    pub coach_phone: String,

    /// One of: pending, approved, rejected.
    /// Only approved teams may register for contests.
    pub status: String,

    pub created_by: i32,
    #[sea_orm(belongs_to, from = "created_by", to = "id")]
    pub creator: HasOne<super::user::Entity>,

    /// The roster. A team is registrable only with exactly 3 members.
    #[sea_orm(has_many)]
    pub members: HasMany<super::team_member::Entity>,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::contest_registration::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
