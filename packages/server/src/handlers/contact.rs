use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::contact_message;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contact::*;
use crate::models::shared::{PageQuery, Pagination};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contact Messages",
    operation_id = "createContactMessage",
    summary = "Submit a contact message",
    description = "Public contact form endpoint. New messages start in `new` status.",
    request_body = CreateContactMessageRequest,
    responses(
        (status = 201, description = "Message submitted", body = ContactMessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_contact_message(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContactMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_contact_message(&payload)?;

    let new_message = contact_message::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        email: Set(payload.email.trim().to_string()),
        subject: Set(payload.subject.trim().to_string()),
        message: Set(payload.message),
        status: Set("new".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_message.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ContactMessageResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contact Messages",
    operation_id = "listContactMessages",
    summary = "List contact messages",
    description = "Returns a paginated list of contact messages, newest first. Requires `contact:manage` permission.",
    params(PageQuery),
    responses(
        (status = 200, description = "List of messages", body = ContactMessageListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_contact_messages(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ContactMessageListResponse>, AppError> {
    auth_user.require_permission("contact:manage")?;
    let (page, per_page) = query.clamped();

    let select = contact_message::Entity::find();
    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .order_by_desc(contact_message::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(ContactMessageResponse::from)
        .collect();

    Ok(Json(ContactMessageListResponse {
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
    patch,
    path = "/{id}/status",
    tag = "Contact Messages",
    operation_id = "updateContactMessageStatus",
    summary = "Update a contact message's status",
    description = "Moves a message between `new`, `read` and `replied`. Requires `contact:manage` permission.",
    params(("id" = i32, Path, description = "Message ID")),
    request_body = UpdateContactStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ContactMessageResponse),
        (status = 400, description = "Invalid status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Message not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id, status = %payload.status))]
pub async fn update_contact_message_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateContactStatusRequest>,
) -> Result<Json<ContactMessageResponse>, AppError> {
    auth_user.require_permission("contact:manage")?;
    validate_contact_status(&payload.status)?;

    let model = contact_message::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".into()))?;

    let mut active: contact_message::ActiveModel = model.into();
    active.status = Set(payload.status);
    let updated = active.update(&state.db).await?;

    Ok(Json(updated.into()))
}
