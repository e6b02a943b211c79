use axum::{
    extract::{FromRequest, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::record::StoredResume;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

/// JSON body whose rejections (bad syntax, wrong types, missing content type)
/// are reported in the API error envelope.
#[derive(FromRequest, serde::Deserialize)]
#[from_request(via(Json), rejection(AppError))]
pub struct DocumentBody(pub ResumeDocument);

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
) -> Result<Json<Vec<StoredResume>>, AppError> {
    Ok(Json(state.gateway.list(owner).await?))
}

/// POST /api/v1/resumes
/// Any `userId` in the body is ignored; the owner comes from the session.
pub async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    DocumentBody(document): DocumentBody,
) -> Result<(StatusCode, Json<StoredResume>), AppError> {
    let created = state.gateway.create(owner, &document).await?;
    info!("User {owner} created resume {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(state.gateway.get(id, owner).await?))
}

/// PUT /api/v1/resumes/:id
/// Full-document replace.
pub async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
    DocumentBody(document): DocumentBody,
) -> Result<Json<StoredResume>, AppError> {
    Ok(Json(state.gateway.update(id, owner, &document).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.gateway.delete(id, owner).await?;
    info!("User {owner} deleted resume {id}");
    Ok(Json(json!({ "message": "Resume deleted successfully" })))
}
