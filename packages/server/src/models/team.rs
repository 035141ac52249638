use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_name};
use crate::error::AppError;

/// One roster entry in a team create / add-member request.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct TeamMemberInput {
    #[schema(example = "Layla Hassan")]
    pub name: String,
    #[schema(example = "layla@university.edu")]
    pub email: String,
    #[schema(example = "20231042")]
    pub student_id: String,
    #[schema(example = 3)]
    pub year: i32,
    #[schema(example = "Computer Science")]
    pub major: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
    pub university: String,
    pub coach_name: String,
    pub coach_email: String,
    pub coach_phone: String,
    /// The full roster. Exactly 3 members, created atomically with the team;
    /// the first entry becomes the captain.
    pub members: Vec<TeamMemberInput>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateTeamStatusRequest {
    /// One of: pending, approved, rejected.
    #[schema(example = "approved")]
    pub status: String,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamMemberResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub year: i32,
    pub major: String,
    pub role: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub name: String,
    pub university: String,
    pub coach_name: String,
    pub coach_email: String,
    pub coach_phone: String,
    pub status: String,
    pub created_by: i32,
    pub members: Vec<TeamMemberResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct TeamListItem {
    pub id: i32,
    pub name: String,
    pub university: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamListResponse {
    pub data: Vec<TeamListItem>,
    pub pagination: Pagination,
}

impl From<crate::entity::team_member::Model> for TeamMemberResponse {
    fn from(m: crate::entity::team_member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            student_id: m.student_id,
            year: m.year,
            major: m.major,
            role: m.role,
        }
    }
}

impl TeamResponse {
    pub fn from_parts(
        team: crate::entity::team::Model,
        members: Vec<crate::entity::team_member::Model>,
    ) -> Self {
        Self {
            id: team.id,
            name: team.name,
            university: team.university,
            coach_name: team.coach_name,
            coach_email: team.coach_email,
            coach_phone: team.coach_phone,
            status: team.status,
            created_by: team.created_by,
            members: members.into_iter().map(TeamMemberResponse::from).collect(),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

pub fn validate_member_input(member: &TeamMemberInput) -> Result<(), AppError> {
    if member.name.trim().is_empty()
        || member.email.trim().is_empty()
        || member.student_id.trim().is_empty()
        || member.major.trim().is_empty()
    {
        return Err(AppError::Validation(
            "All member information is required".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_team(req: &CreateTeamRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Team name")?;
    if req.university.trim().is_empty()
        || req.coach_name.trim().is_empty()
        || req.coach_email.trim().is_empty()
        || req.coach_phone.trim().is_empty()
    {
        return Err(AppError::Validation(
            "All team information fields are required".into(),
        ));
    }
    if req.members.len() != 3 {
        return Err(AppError::Validation(
            "Team must have exactly 3 members".into(),
        ));
    }
    for member in &req.members {
        validate_member_input(member)?;
    }
    Ok(())
}

pub fn validate_team_status(status: &str) -> Result<(), AppError> {
    match status {
        "pending" | "approved" | "rejected" => Ok(()),
        _ => Err(AppError::Validation("Invalid status".into())),
    }
}
