use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_email};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVolunteerApplicationRequest {
    #[schema(example = "Omar Farouk")]
    pub name: String,
    #[schema(example = "omar@university.edu")]
    pub email: String,
    pub phone: String,
    /// One of: media, logistics, ops, volunteers.
    #[schema(example = "logistics")]
    pub team: String,
    pub experience: String,
    pub availability: String,
    pub motivation: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct VolunteerListQuery {
    /// Filter by volunteer team (media, logistics, ops, volunteers).
    pub team: Option<String>,
    /// Page number (1-based, defaults to 1).
    pub page: Option<u64>,
    /// Items per page (defaults to 20, max 100).
    pub per_page: Option<u64>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateVolunteerStatusRequest {
    /// One of: pending, approved, rejected.
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct VolunteerApplicationResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub team: String,
    pub experience: String,
    pub availability: String,
    pub motivation: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct VolunteerApplicationListResponse {
    pub data: Vec<VolunteerApplicationResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::volunteer_application::Model> for VolunteerApplicationResponse {
    fn from(a: crate::entity::volunteer_application::Model) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            team: a.team,
            experience: a.experience,
            availability: a.availability,
            motivation: a.motivation,
            status: a.status,
            created_at: a.created_at,
        }
    }
}

pub fn validate_volunteer_application(
    req: &CreateVolunteerApplicationRequest,
) -> Result<(), AppError> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.phone.trim().is_empty()
        || req.experience.trim().is_empty()
        || req.availability.trim().is_empty()
        || req.motivation.trim().is_empty()
    {
        return Err(AppError::Validation("All fields are required".into()));
    }
    validate_email(&req.email)?;
    match req.team.as_str() {
        "media" | "logistics" | "ops" | "volunteers" => Ok(()),
        _ => Err(AppError::Validation("Invalid team selection".into())),
    }
}

pub fn validate_volunteer_status(status: &str) -> Result<(), AppError> {
    match status {
        "pending" | "approved" | "rejected" => Ok(()),
        _ => Err(AppError::Validation("Invalid status".into())),
    }
}
