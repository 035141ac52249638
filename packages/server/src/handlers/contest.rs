use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, schedule_event};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contest::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contests",
    operation_id = "createContest",
    summary = "Create a new contest",
    description = "Creates a contest. Requires `contest:manage` permission. The registration window bounds and team cap are optional; absent bounds leave registration open-ended and an absent cap means unlimited teams.",
    request_body = CreateContestRequest,
    responses(
        (status = 201, description = "Contest created", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContestRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("contest:manage")?;
    validate_create_contest(&payload)?;

    let now = chrono::Utc::now();
    let new_contest = contest::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        is_active: Set(payload.is_active),
        registration_start: Set(payload.registration_start),
        registration_end: Set(payload.registration_end),
        max_teams: Set(payload.max_teams),
        location: Set(payload.location),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_contest.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ContestResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contests",
    operation_id = "listContests",
    summary = "List contests",
    description = "Returns a paginated list of contests, most recent start date first. Public.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of contests", body = ContestListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_contests(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ContestListResponse>, AppError> {
    let (page, per_page) = query.clamped();

    let select = contest::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(contest::Column::StartDate)
        .select_only()
        .column(contest::Column::Id)
        .column(contest::Column::Name)
        .column(contest::Column::StartDate)
        .column(contest::Column::EndDate)
        .column(contest::Column::IsActive)
        .column(contest::Column::RegistrationStart)
        .column(contest::Column::RegistrationEnd)
        .column(contest::Column::MaxTeams)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<ContestListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ContestListResponse {
        data,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/active",
    tag = "Contests",
    operation_id = "getActiveContest",
    summary = "Get the active contest",
    description = "Returns the contest currently flagged `is_active`, schedule expanded. Public.",
    responses(
        (status = 200, description = "Active contest", body = ContestDetailResponse),
        (status = 404, description = "No active contest (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_active_contest(
    State(state): State<AppState>,
) -> Result<Json<ContestDetailResponse>, AppError> {
    let model = contest::Entity::find()
        .filter(contest::Column::IsActive.eq(true))
        .order_by_asc(contest::Column::Id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active contest found".into()))?;

    let schedule = load_schedule(&state.db, model.id).await?;
    Ok(Json(ContestDetailResponse {
        contest: model.into(),
        schedule,
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contests",
    operation_id = "getContest",
    summary = "Get a contest by ID",
    description = "Returns the contest with its schedule expanded, events ordered by day then start time. Public.",
    params(("id" = i32, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest details", body = ContestDetailResponse),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContestDetailResponse>, AppError> {
    let model = find_contest(&state.db, id).await?;
    let schedule = load_schedule(&state.db, id).await?;
    Ok(Json(ContestDetailResponse {
        contest: model.into(),
        schedule,
    }))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Contests",
    operation_id = "updateContest",
    summary = "Update an existing contest",
    description = "Partially updates a contest using PATCH semantics. Requires `contest:manage` permission. An empty payload returns the current resource unchanged. Cross-field validation ensures end_date stays after start_date even when updating one of the two.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = UpdateContestRequest,
    responses(
        (status = 200, description = "Contest updated", body = ContestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContestRequest>,
) -> Result<Json<ContestResponse>, AppError> {
    auth_user.require_permission("contest:manage")?;

    if payload == UpdateContestRequest::default() {
        let existing = find_contest(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    if let Some(ref name) = payload.name {
        crate::models::shared::validate_name(name, "Contest name")?;
    }
    if let Some(max) = payload.max_teams
        && max <= 0
    {
        return Err(AppError::Validation(
            "Maximum teams must be a positive number".into(),
        ));
    }

    let txn = state.db.begin().await?;
    let existing = find_contest_for_update(&txn, id).await?;

    // Cross-field date validation against existing values
    let effective_start = payload.start_date.unwrap_or(existing.start_date);
    let effective_end = payload.end_date.unwrap_or(existing.end_date);
    if effective_end <= effective_start {
        return Err(AppError::Validation(
            "Contest end date must be after start date".into(),
        ));
    }

    let mut active: contest::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(registration_start) = payload.registration_start {
        active.registration_start = Set(Some(registration_start));
    }
    if let Some(registration_end) = payload.registration_end {
        active.registration_end = Set(Some(registration_end));
    }
    if let Some(max_teams) = payload.max_teams {
        active.max_teams = Set(Some(max_teams));
    }
    if let Some(location) = payload.location {
        active.location = Set(Some(location));
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/schedule",
    tag = "Contests",
    operation_id = "addScheduleEvent",
    summary = "Add a schedule event to a contest",
    description = "Adds one event to the contest schedule. Requires `contest:manage` permission.",
    params(("id" = i32, Path, description = "Contest ID")),
    request_body = CreateScheduleEventRequest,
    responses(
        (status = 201, description = "Event added", body = ScheduleEventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id))]
pub async fn add_schedule_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(contest_id): Path<i32>,
    AppJson(payload): AppJson<CreateScheduleEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("contest:manage")?;
    validate_schedule_event(&payload)?;

    let txn = state.db.begin().await?;
    find_contest_for_update(&txn, contest_id).await?;

    let new_event = schedule_event::ActiveModel {
        contest_id: Set(contest_id),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        day: Set(payload.day),
        location: Set(payload.location),
        event_type: Set(payload.event_type),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_event.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(ScheduleEventResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}/schedule/{event_id}",
    tag = "Contests",
    operation_id = "removeScheduleEvent",
    summary = "Remove a schedule event",
    description = "Deletes one event from the contest schedule. Requires `contest:manage` permission.",
    params(
        ("id" = i32, Path, description = "Contest ID"),
        ("event_id" = i32, Path, description = "Schedule event ID"),
    ),
    responses(
        (status = 204, description = "Event removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Contest or event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id, event_id))]
pub async fn remove_schedule_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((contest_id, event_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("contest:manage")?;

    let txn = state.db.begin().await?;
    find_contest_for_update(&txn, contest_id).await?;

    let event = schedule_event::Entity::find_by_id(event_id)
        .filter(schedule_event::Column::ContestId.eq(contest_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Schedule event not found".into()))?;

    let active: schedule_event::ActiveModel = event.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_contest<C: ConnectionTrait>(db: &C, id: i32) -> Result<contest::Model, AppError> {
    contest::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

async fn find_contest_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<contest::Model, AppError> {
    use sea_orm::sea_query::LockType;
    contest::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Contest not found".into()))
}

async fn load_schedule<C: ConnectionTrait>(
    db: &C,
    contest_id: i32,
) -> Result<Vec<ScheduleEventResponse>, AppError> {
    let events = schedule_event::Entity::find()
        .filter(schedule_event::Column::ContestId.eq(contest_id))
        .order_by_asc(schedule_event::Column::Day)
        .order_by_asc(schedule_event::Column::StartTime)
        .all(db)
        .await?;
    Ok(events.into_iter().map(ScheduleEventResponse::from).collect())
}
