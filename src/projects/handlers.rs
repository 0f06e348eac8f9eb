use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::BearerToken,
    error::ApiError,
    state::AppState,
};

use super::dto::{MessageResponse, ProjectEnvelope, ProjectInput, ProjectList};

pub(crate) const PROJECT_NOT_FOUND: &str = "Project not found";

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// Ids that are not UUIDs cannot name a stored project.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(PROJECT_NOT_FOUND))
}

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<ProjectList>, ApiError> {
    let projects = state.projects.list().await?;
    Ok(Json(ProjectList { projects }))
}

#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    match state.projects.get(id).await? {
        Some(project) => Ok(Json(ProjectEnvelope { project })),
        None => Err(ApiError::not_found(PROJECT_NOT_FOUND)),
    }
}

#[instrument(skip(state, _token, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    _token: BearerToken,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectEnvelope>), ApiError> {
    let Json(input) = payload?;

    let Some(new) = input.into_new() else {
        warn!("create project missing name or description");
        return Err(ApiError::bad_request("Name and description are required"));
    };

    let project = state.projects.create(new).await?;
    info!(project_id = %project.id, name = %project.name, "project created");
    Ok((StatusCode::CREATED, Json(ProjectEnvelope { project })))
}

#[instrument(skip(state, _token, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(id): Path<String>,
    payload: Result<Json<ProjectInput>, JsonRejection>,
) -> Result<Json<ProjectEnvelope>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;

    match state.projects.update(id, input.into_patch()).await? {
        Some(project) => {
            info!(project_id = %project.id, "project updated");
            Ok(Json(ProjectEnvelope { project }))
        }
        None => Err(ApiError::not_found(PROJECT_NOT_FOUND)),
    }
}

#[instrument(skip(state, _token))]
pub async fn delete_project(
    State(state): State<AppState>,
    _token: BearerToken,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;

    if !state.projects.delete(id).await? {
        return Err(ApiError::not_found(PROJECT_NOT_FOUND));
    }

    info!(project_id = %id, "project deleted");
    Ok(Json(MessageResponse {
        message: "Project deleted successfully".into(),
    }))
}
