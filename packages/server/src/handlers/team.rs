use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{contest_registration, team, team_member};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::{PageQuery, Pagination};
use crate::models::team::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Teams",
    operation_id = "createTeam",
    summary = "Create a team with its full roster",
    description = "Creates a team owned by the caller, with exactly 3 members inserted in the same transaction. The first member becomes the captain. New teams start in `pending` status and must be approved before they can register for contests.",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_team(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let new_team = team::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        university: Set(payload.university.trim().to_string()),
        coach_name: Set(payload.coach_name.trim().to_string()),
        coach_email: Set(payload.coach_email.trim().to_string()),
        coach_phone: Set(payload.coach_phone.trim().to_string()),
        status: Set("pending".to_string()),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let team_model = new_team.insert(&txn).await?;

    let mut members = Vec::with_capacity(payload.members.len());
    for (i, member) in payload.members.into_iter().enumerate() {
        let role = if i == 0 { "captain" } else { "member" };
        let new_member = team_member::ActiveModel {
            team_id: Set(team_model.id),
            name: Set(member.name.trim().to_string()),
            email: Set(member.email.trim().to_string()),
            student_id: Set(member.student_id.trim().to_string()),
            year: Set(member.year),
            major: Set(member.major.trim().to_string()),
            role: Set(role.to_string()),
            created_at: Set(now),
            ..Default::default()
        };
        members.push(new_member.insert(&txn).await?);
    }

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamResponse::from_parts(team_model, members)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Teams",
    operation_id = "listTeams",
    summary = "List teams",
    description = "Returns a paginated list of teams, newest first. Public.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of teams", body = TeamListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TeamListResponse>, AppError> {
    let (page, per_page) = query.clamped();

    let select = team::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(team::Column::CreatedAt)
        .select_only()
        .column(team::Column::Id)
        .column(team::Column::Name)
        .column(team::Column::University)
        .column(team::Column::Status)
        .column(team::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<TeamListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(TeamListResponse {
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
    path = "/my-teams",
    tag = "Teams",
    operation_id = "myTeams",
    summary = "List the caller's teams",
    description = "Returns the teams created by the authenticated user, rosters expanded.",
    responses(
        (status = 200, description = "Caller's teams", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let teams = team::Entity::find()
        .filter(team::Column::CreatedBy.eq(auth_user.user_id))
        .order_by_desc(team::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut out = Vec::with_capacity(teams.len());
    for team_model in teams {
        let members = load_roster(&state.db, team_model.id).await?;
        out.push(TeamResponse::from_parts(team_model, members));
    }
    Ok(Json(out))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Teams",
    operation_id = "getTeam",
    summary = "Get a team by ID",
    description = "Returns the team with its roster expanded. Public.",
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team details", body = TeamResponse),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamResponse>, AppError> {
    let team_model = find_team(&state.db, id).await?;
    let members = load_roster(&state.db, id).await?;
    Ok(Json(TeamResponse::from_parts(team_model, members)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Teams",
    operation_id = "deleteTeam",
    summary = "Delete a team",
    description = "Deletes a team along with its members and contest registrations. Only the team owner or a user with `team:manage` may delete.",
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the team owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let team_model = find_team(&txn, id).await?;
    check_team_owner(&auth_user, &team_model)?;

    contest_registration::Entity::delete_many()
        .filter(contest_registration::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    team_member::Entity::delete_many()
        .filter(team_member::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    team::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = "Teams",
    operation_id = "updateTeamStatus",
    summary = "Approve or reject a team",
    description = "Moves a team between `pending`, `approved` and `rejected`. Requires `team:manage` permission.",
    params(("id" = i32, Path, description = "Team ID")),
    request_body = UpdateTeamStatusRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamResponse),
        (status = 400, description = "Invalid status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn update_team_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateTeamStatusRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    auth_user.require_permission("team:manage")?;
    validate_team_status(&payload.status)?;

    let team_model = find_team(&state.db, id).await?;
    let mut active: team::ActiveModel = team_model.into();
    active.status = Set(payload.status);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&state.db).await?;

    let members = load_roster(&state.db, id).await?;
    Ok(Json(TeamResponse::from_parts(updated, members)))
}

#[utoipa::path(
    post,
    path = "/{id}/members",
    tag = "Teams",
    operation_id = "addTeamMember",
    summary = "Add a member to a team",
    description = "Adds one member to the roster. The roster is capped at 3; teams at the cap get a validation error. Only the team owner or a user with `team:manage` may add members.",
    params(("id" = i32, Path, description = "Team ID")),
    request_body = TeamMemberInput,
    responses(
        (status = 201, description = "Member added", body = TeamMemberResponse),
        (status = 400, description = "Roster full or invalid member (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the team owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_id))]
pub async fn add_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    AppJson(payload): AppJson<TeamMemberInput>,
) -> Result<impl IntoResponse, AppError> {
    validate_member_input(&payload)?;

    let txn = state.db.begin().await?;
    let team_model = find_team_for_update(&txn, team_id).await?;
    check_team_owner(&auth_user, &team_model)?;

    let current = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .count(&txn)
        .await?;
    if current >= 3 {
        return Err(AppError::Validation(
            "Team already has 3 members (maximum limit)".into(),
        ));
    }

    let new_member = team_member::ActiveModel {
        team_id: Set(team_id),
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        student_id: Set(payload.student_id.trim().to_string()),
        year: Set(payload.year),
        major: Set(payload.major.trim().to_string()),
        role: Set("member".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_member.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TeamMemberResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}/members/{member_id}",
    tag = "Teams",
    operation_id = "removeTeamMember",
    summary = "Remove a member from a team",
    description = "Removes one roster entry. A team below 3 members cannot register for contests until refilled. Only the team owner or a user with `team:manage` may remove members.",
    params(
        ("id" = i32, Path, description = "Team ID"),
        ("member_id" = i32, Path, description = "Team member ID"),
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the team owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(team_id, member_id))]
pub async fn remove_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((team_id, member_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let team_model = find_team_for_update(&txn, team_id).await?;
    check_team_owner(&auth_user, &team_model)?;

    let member = team_member::Entity::find_by_id(member_id)
        .filter(team_member::Column::TeamId.eq(team_id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team member not found".into()))?;

    let active: team_member::ActiveModel = member.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

fn check_team_owner(auth_user: &AuthUser, team: &team::Model) -> Result<(), AppError> {
    if team.created_by == auth_user.user_id || auth_user.has_permission("team:manage") {
        return Ok(());
    }
    Err(AppError::PermissionDenied(
        "You can only manage your own team".into(),
    ))
}

async fn find_team<C: ConnectionTrait>(db: &C, id: i32) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

async fn find_team_for_update(txn: &DatabaseTransaction, id: i32) -> Result<team::Model, AppError> {
    use sea_orm::sea_query::LockType;
    team::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}

async fn load_roster<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
) -> Result<Vec<team_member::Model>, AppError> {
    Ok(team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team_id))
        .order_by_asc(team_member::Column::Id)
        .all(db)
        .await?)
}
