use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Links one team to one contest.
///
/// At most one registration may exist per (team_id, contest_id) pair;
/// schema-sync cannot express composite unique indexes, so the backing
/// index is created by `seed::ensure_indexes` at startup.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest_registration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_id: i32,
    #[sea_orm(belongs_to, from = "team_id", to = "id")]
    pub team: HasOne<super::team::Entity>,

    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub registration_date: DateTimeUtc,

    /// One of: pending, approved, rejected. New registrations start pending.
    /// Pending and approved registrations both count against contest capacity.
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
