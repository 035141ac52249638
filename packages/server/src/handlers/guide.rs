use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::guide;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::guide::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Guide",
    operation_id = "getGuide",
    summary = "Get the participant guide",
    description = "Returns the single guide document. Public.",
    responses(
        (status = 200, description = "Guide content", body = GuideResponse),
        (status = 404, description = "Guide not published yet (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_guide(State(state): State<AppState>) -> Result<Json<GuideResponse>, AppError> {
    let model = guide::Entity::find()
        .order_by_asc(guide::Column::Id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Guide not found".into()))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/",
    tag = "Guide",
    operation_id = "putGuide",
    summary = "Publish or replace the participant guide",
    description = "Upserts the single guide document. Requires `content:manage` permission.",
    request_body = UpdateGuideRequest,
    responses(
        (status = 200, description = "Guide saved", body = GuideResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn put_guide(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateGuideRequest>,
) -> Result<Json<GuideResponse>, AppError> {
    auth_user.require_permission("content:manage")?;
    validate_guide(&payload)?;

    let now = chrono::Utc::now();
    let existing = guide::Entity::find()
        .order_by_asc(guide::Column::Id)
        .one(&state.db)
        .await?;

    let model = match existing {
        Some(model) => {
            let mut active: guide::ActiveModel = model.into();
            active.title = Set(payload.title.trim().to_string());
            active.content = Set(payload.content);
            active.updated_at = Set(now);
            active.update(&state.db).await?
        }
        None => {
            let new_guide = guide::ActiveModel {
                title: Set(payload.title.trim().to_string()),
                content: Set(payload.content),
                updated_at: Set(now),
                ..Default::default()
            };
            new_guide.insert(&state.db).await?
        }
    };

    Ok(Json(model.into()))
}
