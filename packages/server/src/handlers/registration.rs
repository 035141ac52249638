use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest, contest_registration, team, team_member};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::registration::*;
use crate::models::shared::Pagination;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contest Registrations",
    operation_id = "createRegistration",
    summary = "Register a team for a contest",
    description = "Registers one of the caller's teams for a contest. The team must be approved with a full roster of 3, the contest's registration window must be open (bounds inclusive) and the contest must have a free slot. The whole check-and-insert runs in one transaction holding a row lock on the contest, so a full contest never over-admits under concurrent requests. New registrations start in `pending` status.",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = RegistrationDetail),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the caller's team (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or contest not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn create_registration(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRegistrationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (team_id, contest_id) = validate_create_registration(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let team_model = team::Entity::find_by_id(team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))?;

    if team_model.created_by != auth_user.user_id
        && !auth_user.has_permission("registration:manage")
    {
        return Err(AppError::PermissionDenied(
            "You can only register your own team".into(),
        ));
    }

    check_team_approved(&team_model.status)?;

    let members = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .order_by_asc(team_member::Column::Id)
        .all(&txn)
        .await?;
    check_roster_size(members.len() as u64)?;

    let duplicate = contest_registration::Entity::find()
        .filter(contest_registration::Column::TeamId.eq(team_id))
        .filter(contest_registration::Column::ContestId.eq(contest_id))
        .count(&txn)
        .await?;
    if duplicate > 0 {
        return Err(AppError::Validation(
            "Team is already registered for this contest".into(),
        ));
    }

    // The lock serializes the capacity count against concurrent inserts.
    let contest_model = find_contest_for_update(&txn, contest_id).await?;

    check_registration_window(
        contest_model.registration_start,
        contest_model.registration_end,
        now,
    )?;

    let registered = contest_registration::Entity::find()
        .filter(contest_registration::Column::ContestId.eq(contest_id))
        .filter(contest_registration::Column::Status.is_in(["pending", "approved"]))
        .count(&txn)
        .await?;
    check_capacity(contest_model.max_teams, registered)?;

    let new_registration = contest_registration::ActiveModel {
        team_id: Set(team_id),
        contest_id: Set(contest_id),
        registration_date: Set(payload.registration_date.unwrap_or(now)),
        status: Set("pending".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // The unique index on (team_id, contest_id) backstops the pre-check
    // against a racing insert between our count and here.
    let model = match new_registration.insert(&txn).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Validation(
                "Team is already registered for this contest".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    txn.commit().await?;

    tracing::info!(
        registration_id = model.id,
        team_id,
        contest_id,
        "Team registered for contest"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegistrationDetail::from_parts(
            model,
            team_model,
            members,
            contest_model,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contest Registrations",
    operation_id = "listRegistrations",
    summary = "List contest registrations",
    description = "Returns a paginated list of registrations, newest first, optionally filtered by team, contest or status. Public.",
    params(RegistrationListQuery),
    responses(
        (status = 200, description = "List of registrations", body = RegistrationListResponse),
        (status = 400, description = "Invalid filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Json<RegistrationListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = contest_registration::Entity::find();
    if let Some(team_id) = query.team {
        select = select.filter(contest_registration::Column::TeamId.eq(team_id));
    }
    if let Some(contest_id) = query.contest {
        select = select.filter(contest_registration::Column::ContestId.eq(contest_id));
    }
    if let Some(ref status) = query.status {
        validate_registration_status(status)?;
        select = select.filter(contest_registration::Column::Status.eq(status));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(contest_registration::Column::RegistrationDate)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(RegistrationResponse::from)
        .collect();

    Ok(Json(RegistrationListResponse {
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
    path = "/{id}",
    tag = "Contest Registrations",
    operation_id = "getRegistration",
    summary = "Get a registration by ID",
    description = "Returns one registration with its team (roster included) and contest expanded. Public.",
    params(("id" = i32, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration details", body = RegistrationDetail),
        (status = 404, description = "Registration not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RegistrationDetail>, AppError> {
    let model = find_registration(&state.db, id).await?;
    let detail = expand_registration(&state.db, model).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Contest Registrations",
    operation_id = "updateRegistration",
    summary = "Update a registration",
    description = "Changes a registration's status, team or registration date. Requires `registration:manage` permission. A team change re-runs the roster and uniqueness checks; the contest cannot be changed. An empty payload returns the current resource unchanged.",
    params(("id" = i32, Path, description = "Registration ID")),
    request_body = UpdateRegistrationRequest,
    responses(
        (status = 200, description = "Registration updated", body = RegistrationDetail),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Registration or team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_registration(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateRegistrationRequest>,
) -> Result<Json<RegistrationDetail>, AppError> {
    auth_user.require_permission("registration:manage")?;

    if payload == UpdateRegistrationRequest::default() {
        let existing = find_registration(&state.db, id).await?;
        let detail = expand_registration(&state.db, existing).await?;
        return Ok(Json(detail));
    }

    if let Some(ref status) = payload.status {
        validate_registration_status(status)?;
    }

    let txn = state.db.begin().await?;
    let existing = find_registration_for_update(&txn, id).await?;

    if let Some(new_team_id) = payload.team
        && new_team_id != existing.team_id
    {
        team::Entity::find_by_id(new_team_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".into()))?;

        let member_count = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(new_team_id))
            .count(&txn)
            .await?;
        check_roster_size_current(member_count)?;

        let duplicate = contest_registration::Entity::find()
            .filter(contest_registration::Column::TeamId.eq(new_team_id))
            .filter(contest_registration::Column::ContestId.eq(existing.contest_id))
            .filter(contest_registration::Column::Id.ne(id))
            .count(&txn)
            .await?;
        if duplicate > 0 {
            return Err(AppError::Validation(
                "Team is already registered for this contest".into(),
            ));
        }
    }

    let mut active: contest_registration::ActiveModel = existing.into();
    if let Some(new_team_id) = payload.team {
        active.team_id = Set(new_team_id);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(registration_date) = payload.registration_date {
        active.registration_date = Set(registration_date);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = match active.update(&txn).await {
        Ok(model) => model,
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::Validation(
                "Team is already registered for this contest".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    txn.commit().await?;

    let detail = expand_registration(&state.db, model).await?;
    Ok(Json(detail))
}

async fn find_registration<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<contest_registration::Model, AppError> {
    contest_registration::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".into()))
}

async fn find_registration_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<contest_registration::Model, AppError> {
    use sea_orm::sea_query::LockType;
    contest_registration::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".into()))
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

/// Loads the team (with roster) and contest a registration points at. Both
/// are foreign-keyed, so a miss here is a data integrity problem, not a 404.
async fn expand_registration<C: ConnectionTrait>(
    db: &C,
    model: contest_registration::Model,
) -> Result<RegistrationDetail, AppError> {
    let team_model = team::Entity::find_by_id(model.team_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Registration {} references a missing team", model.id))
        })?;
    let members = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(model.team_id))
        .order_by_asc(team_member::Column::Id)
        .all(db)
        .await?;
    let contest_model = contest::Entity::find_by_id(model.contest_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Registration {} references a missing contest",
                model.id
            ))
        })?;

    Ok(RegistrationDetail::from_parts(
        model,
        team_model,
        members,
        contest_model,
    ))
}
