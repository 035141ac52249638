use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_name};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestRequest {
    #[schema(example = "ACPC Qualifiers 2025")]
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Registration opens at this instant (inclusive). Absent means
    /// registration is open as soon as the contest exists.
    pub registration_start: Option<DateTime<Utc>>,
    /// Registration closes at this instant (inclusive). Absent means
    /// registration never closes on time alone.
    pub registration_end: Option<DateTime<Utc>>,
    /// Cap on registered teams, counting pending and approved registrations.
    /// Absent means unlimited.
    #[schema(example = 50)]
    pub max_teams: Option<i32>,
    pub location: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct UpdateContestRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub max_teams: Option<i32>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateScheduleEventRequest {
    #[schema(example = "Opening ceremony")]
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// 1-based day of the contest this event belongs to.
    #[schema(example = 1)]
    pub day: i32,
    pub location: Option<String>,
    /// One of: ceremony, contest, meal, workshop, other.
    #[schema(example = "ceremony")]
    pub event_type: String,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub max_teams: Option<i32>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ContestListItem {
    pub id: i32,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub max_teams: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestListResponse {
    pub data: Vec<ContestListItem>,
    pub pagination: Pagination,
}

/// Contest with its schedule expanded, returned by the get-by-id and
/// active-contest endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestDetailResponse {
    #[serde(flatten)]
    pub contest: ContestResponse,
    /// Schedule events ordered by `(day, start_time)`.
    pub schedule: Vec<ScheduleEventResponse>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScheduleEventResponse {
    pub id: i32,
    pub contest_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub day: i32,
    pub location: Option<String>,
    pub event_type: String,
}

impl From<crate::entity::contest::Model> for ContestResponse {
    fn from(c: crate::entity::contest::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            start_date: c.start_date,
            end_date: c.end_date,
            is_active: c.is_active,
            registration_start: c.registration_start,
            registration_end: c.registration_end,
            max_teams: c.max_teams,
            location: c.location,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<crate::entity::schedule_event::Model> for ScheduleEventResponse {
    fn from(e: crate::entity::schedule_event::Model) -> Self {
        Self {
            id: e.id,
            contest_id: e.contest_id,
            title: e.title,
            description: e.description,
            start_time: e.start_time,
            end_time: e.end_time,
            day: e.day,
            location: e.location,
            event_type: e.event_type,
        }
    }
}

pub fn validate_create_contest(req: &CreateContestRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Contest name")?;
    if req.end_date <= req.start_date {
        return Err(AppError::Validation(
            "Contest end date must be after start date".into(),
        ));
    }
    if let (Some(start), Some(end)) = (req.registration_start, req.registration_end)
        && end < start
    {
        return Err(AppError::Validation(
            "Registration end must not be before registration start".into(),
        ));
    }
    if let Some(max) = req.max_teams
        && max <= 0
    {
        return Err(AppError::Validation(
            "Maximum teams must be a positive number".into(),
        ));
    }
    Ok(())
}

pub fn validate_schedule_event(req: &CreateScheduleEventRequest) -> Result<(), AppError> {
    validate_name(&req.title, "Event title")?;
    if req.end_time <= req.start_time {
        return Err(AppError::Validation(
            "Event end time must be after start time".into(),
        ));
    }
    if req.day < 1 {
        return Err(AppError::Validation("Event day must be at least 1".into()));
    }
    match req.event_type.as_str() {
        "ceremony" | "contest" | "meal" | "workshop" | "other" => Ok(()),
        _ => Err(AppError::Validation("Invalid event type".into())),
    }
}
