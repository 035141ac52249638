use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateGuideRequest {
    #[schema(example = "Participant guide")]
    pub title: String,
    /// Markdown body shown on the guide page.
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GuideResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::guide::Model> for GuideResponse {
    fn from(g: crate::entity::guide::Model) -> Self {
        Self {
            id: g.id,
            title: g.title,
            content: g.content,
            updated_at: g.updated_at,
        }
    }
}

pub fn validate_guide(req: &UpdateGuideRequest) -> Result<(), AppError> {
    validate_name(&req.title, "Guide title")?;
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Guide content is required".into()));
    }
    Ok(())
}
