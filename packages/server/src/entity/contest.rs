use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub description: String, // in Markdown
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    /// At most one contest is active at a time; `GET /contests/active`
    /// returns it with its schedule.
    pub is_active: bool,

    /// Registration window. NULL bounds are unbounded on that side.
    pub registration_start: Option<DateTimeUtc>,
    pub registration_end: Option<DateTimeUtc>,

    /// Capacity in teams counting pending and approved registrations.
    /// NULL means unlimited.
    pub max_teams: Option<i32>,

    pub location: Option<String>,

    #[sea_orm(has_many)]
    pub schedule_events: HasMany<super::schedule_event::Entity>,

    #[sea_orm(has_many)]
    pub registrations: HasMany<super::contest_registration::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
