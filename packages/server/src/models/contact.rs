use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_email};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContactMessageRequest {
    #[schema(example = "Nour El-Din")]
    pub name: String,
    #[schema(example = "nour@example.com")]
    pub email: String,
    #[schema(example = "Accommodation question")]
    pub subject: String,
    pub message: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateContactStatusRequest {
    /// One of: new, read, replied.
    #[schema(example = "read")]
    pub status: String,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ContactMessageResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactMessageListResponse {
    pub data: Vec<ContactMessageResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::contact_message::Model> for ContactMessageResponse {
    fn from(m: crate::entity::contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

pub fn validate_contact_message(req: &CreateContactMessageRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.subject.trim().is_empty()
        || req.message.trim().is_empty()
    {
        return Err(AppError::Validation("All fields are required".into()));
    }
    validate_email(&req.email)
}

pub fn validate_contact_status(status: &str) -> Result<(), AppError> {
    match status {
        "new" | "read" | "replied" => Ok(()),
        _ => Err(AppError::Validation("Invalid status".into())),
    }
}
