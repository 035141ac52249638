use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::volunteer_application;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::Pagination;
use crate::models::volunteer::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Volunteer Applications",
    operation_id = "createVolunteerApplication",
    summary = "Submit a volunteer application",
    description = "Open to anonymous callers; when a valid token is presented the application is attributed to that account so the applicant can track it later.",
    request_body = CreateVolunteerApplicationRequest,
    responses(
        (status = 201, description = "Application submitted", body = VolunteerApplicationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid token supplied (TOKEN_INVALID)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(team = %payload.team))]
pub async fn create_volunteer_application(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateVolunteerApplicationRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_volunteer_application(&payload)?;

    let new_application = volunteer_application::ActiveModel {
        user_id: Set(auth_user.map(|u| u.user_id)),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        team: Set(payload.team),
        experience: Set(payload.experience),
        availability: Set(payload.availability),
        motivation: Set(payload.motivation),
        status: Set("pending".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_application.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(VolunteerApplicationResponse::from(model)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Volunteer Applications",
    operation_id = "listVolunteerApplications",
    summary = "List volunteer applications",
    description = "Users with `volunteer:manage` see every application, optionally filtered by volunteer team; everyone else sees only their own.",
    params(VolunteerListQuery),
    responses(
        (status = 200, description = "List of applications", body = VolunteerApplicationListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_volunteer_applications(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<VolunteerListQuery>,
) -> Result<Json<VolunteerApplicationListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let mut select = volunteer_application::Entity::find();
    if auth_user.has_permission("volunteer:manage") {
        if let Some(ref team) = query.team {
            select = select.filter(volunteer_application::Column::Team.eq(team));
        }
    } else {
        select = select.filter(volunteer_application::Column::UserId.eq(auth_user.user_id));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(volunteer_application::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(VolunteerApplicationResponse::from)
        .collect();

    Ok(Json(VolunteerApplicationListResponse {
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
    tag = "Volunteer Applications",
    operation_id = "getVolunteerApplication",
    summary = "Get a volunteer application by ID",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application details", body = VolunteerApplicationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the applicant (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Application not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn get_volunteer_application(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<VolunteerApplicationResponse>, AppError> {
    let model = find_application(&state.db, id).await?;
    check_application_owner(&auth_user, &model)?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Volunteer Applications",
    operation_id = "updateVolunteerApplication",
    summary = "Update a volunteer application",
    description = "Replaces the application's details. Only the applicant (or `volunteer:manage`) may update; the review status is not touched here.",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = CreateVolunteerApplicationRequest,
    responses(
        (status = 200, description = "Application updated", body = VolunteerApplicationResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the applicant (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Application not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_volunteer_application(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateVolunteerApplicationRequest>,
) -> Result<Json<VolunteerApplicationResponse>, AppError> {
    validate_volunteer_application(&payload)?;

    let model = find_application(&state.db, id).await?;
    check_application_owner(&auth_user, &model)?;

    let mut active: volunteer_application::ActiveModel = model.into();
    active.name = Set(payload.name.trim().to_string());
    active.email = Set(payload.email.trim().to_string());
    active.phone = Set(payload.phone.trim().to_string());
    active.team = Set(payload.team);
    active.experience = Set(payload.experience);
    active.availability = Set(payload.availability);
    active.motivation = Set(payload.motivation);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Volunteer Applications",
    operation_id = "updateVolunteerApplicationStatus",
    summary = "Review a volunteer application",
    description = "Moves an application between `pending`, `approved` and `rejected`. Requires `volunteer:manage` permission.",
    params(("id" = i32, Path, description = "Application ID")),
    request_body = UpdateVolunteerStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = VolunteerApplicationResponse),
        (status = 400, description = "Invalid status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Application not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn update_volunteer_application_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateVolunteerStatusRequest>,
) -> Result<Json<VolunteerApplicationResponse>, AppError> {
    auth_user.require_permission("volunteer:manage")?;
    validate_volunteer_status(&payload.status)?;

    let model = find_application(&state.db, id).await?;
    let mut active: volunteer_application::ActiveModel = model.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Volunteer Applications",
    operation_id = "deleteVolunteerApplication",
    summary = "Withdraw a volunteer application",
    params(("id" = i32, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the applicant (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Application not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_volunteer_application(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let model = find_application(&state.db, id).await?;
    check_application_owner(&auth_user, &model)?;

    let active: volunteer_application::ActiveModel = model.into();
    active.delete(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Anonymous submissions have no owner, so only `volunteer:manage` reaches them.
fn check_application_owner(
    auth_user: &AuthUser,
    application: &volunteer_application::Model,
) -> Result<(), AppError> {
    if auth_user.has_permission("volunteer:manage")
        || application.user_id == Some(auth_user.user_id)
    {
        return Ok(());
    }
    Err(AppError::permission_denied())
}

async fn find_application<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<volunteer_application::Model, AppError> {
    volunteer_application::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".into()))
}
