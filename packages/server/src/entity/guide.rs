use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The participant guide. A single replace-on-write document.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guide")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub content: String, // in Markdown

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
