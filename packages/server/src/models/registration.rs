use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::Pagination;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRegistrationRequest {
    /// Team id.
    #[schema(example = 1)]
    pub team: Option<i32>,
    /// Contest id.
    #[schema(example = 1)]
    pub contest: Option<i32>,
    /// Defaults to the time of the request when absent.
    pub registration_date: Option<DateTime<Utc>>,
}

#[derive(Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateRegistrationRequest {
    /// Move the registration to another team. The new team goes through the
    /// same roster and uniqueness checks as on create.
    pub team: Option<i32>,
    /// One of: pending, approved, rejected.
    pub status: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct RegistrationListQuery {
    /// Filter by team id.
    pub team: Option<i32>,
    /// Filter by contest id.
    pub contest: Option<i32>,
    /// Filter by status (pending, approved, rejected).
    pub status: Option<String>,
    /// Page number (1-based, defaults to 1).
    pub page: Option<u64>,
    /// Items per page (defaults to 20, max 100).
    pub per_page: Option<u64>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct RegistrationResponse {
    pub id: i32,
    pub team_id: i32,
    pub contest_id: i32,
    pub registration_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RegistrationTeamSummary {
    pub id: i32,
    pub name: String,
    pub university: String,
    pub status: String,
    pub members: Vec<super::team::TeamMemberResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RegistrationContestSummary {
    pub id: i32,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Registration with its team and contest expanded, returned by the create
/// and get-by-id endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct RegistrationDetail {
    pub id: i32,
    pub team: RegistrationTeamSummary,
    pub contest: RegistrationContestSummary,
    pub registration_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RegistrationListResponse {
    pub data: Vec<RegistrationResponse>,
    pub pagination: Pagination,
}

impl From<crate::entity::contest_registration::Model> for RegistrationResponse {
    fn from(r: crate::entity::contest_registration::Model) -> Self {
        Self {
            id: r.id,
            team_id: r.team_id,
            contest_id: r.contest_id,
            registration_date: r.registration_date,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl RegistrationDetail {
    pub fn from_parts(
        registration: crate::entity::contest_registration::Model,
        team: crate::entity::team::Model,
        members: Vec<crate::entity::team_member::Model>,
        contest: crate::entity::contest::Model,
    ) -> Self {
        Self {
            id: registration.id,
            team: RegistrationTeamSummary {
                id: team.id,
                name: team.name,
                university: team.university,
                status: team.status,
                members: members
                    .into_iter()
                    .map(super::team::TeamMemberResponse::from)
                    .collect(),
            },
            contest: RegistrationContestSummary {
                id: contest.id,
                name: contest.name,
                start_date: contest.start_date,
                end_date: contest.end_date,
            },
            registration_date: registration.registration_date,
            status: registration.status,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Registration checks
//
// Each rule the create/update paths enforce lives here as a pure function so
// the boundary cases are testable without a database. The handlers decide
// ordering and supply the counts.
// ---------------------------------------------------------------------------

/// A team registers with a full roster or not at all.
pub const REQUIRED_ROSTER_SIZE: u64 = 3;

/// Both ids must be present before anything else is looked at.
pub fn validate_create_registration(
    req: &CreateRegistrationRequest,
) -> Result<(i32, i32), AppError> {
    match (req.team, req.contest) {
        (Some(team_id), Some(contest_id)) => Ok((team_id, contest_id)),
        _ => Err(AppError::Validation("Team and contest are required".into())),
    }
}

pub fn check_team_approved(status: &str) -> Result<(), AppError> {
    if status != "approved" {
        return Err(AppError::Validation(
            "Team must be approved before registering for contests".into(),
        ));
    }
    Ok(())
}

pub fn check_roster_size(member_count: u64) -> Result<(), AppError> {
    if member_count != REQUIRED_ROSTER_SIZE {
        return Err(AppError::Validation(format!(
            "Team must have exactly 3 members. Your team has {member_count} members."
        )));
    }
    Ok(())
}

/// Same rule as [`check_roster_size`], phrased for a registration that
/// already exists and is being moved to another team.
pub fn check_roster_size_current(member_count: u64) -> Result<(), AppError> {
    if member_count != REQUIRED_ROSTER_SIZE {
        return Err(AppError::Validation(format!(
            "Team must have exactly 3 members. Current team has {member_count} members."
        )));
    }
    Ok(())
}

/// Both bounds are inclusive: registering at the exact opening or closing
/// instant succeeds.
pub fn check_registration_window(
    registration_start: Option<DateTime<Utc>>,
    registration_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if let Some(start) = registration_start
        && now < start
    {
        return Err(AppError::Validation(
            "Registration has not started yet".into(),
        ));
    }
    if let Some(end) = registration_end
        && now > end
    {
        return Err(AppError::Validation("Registration has ended".into()));
    }
    Ok(())
}

/// `registered` counts pending and approved registrations; rejected ones do
/// not hold a slot.
pub fn check_capacity(max_teams: Option<i32>, registered: u64) -> Result<(), AppError> {
    if let Some(max) = max_teams
        && registered >= max.max(0) as u64
    {
        return Err(AppError::Validation(
            "Contest has reached maximum number of teams".into(),
        ));
    }
    Ok(())
}

pub fn validate_registration_status(status: &str) -> Result<(), AppError> {
    match status {
        "pending" | "approved" | "rejected" => Ok(()),
        _ => Err(AppError::Validation("Invalid status".into())),
    }
}
