use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, SignInRequest, SignUpRequest},
        password::{hash_password, verify_password},
        repo_types::NewUser,
        token::issue_token,
    },
    error::{ApiError, StoreError},
    state::AppState,
};

pub(crate) const EMAIL_IN_USE: &str = "Email already in use";
pub(crate) const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

fn required(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password), Some(name)) = (
        required(payload.email),
        required(payload.password),
        required(payload.name),
    ) else {
        warn!("signup missing fields");
        return Err(ApiError::bad_request(
            "Email, password, and name are required",
        ));
    };

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already in use");
        return Err(ApiError::bad_request(EMAIL_IN_USE));
    }

    let password_hash = hash_password(&password)?;

    let user = match state
        .users
        .create(NewUser {
            email,
            password_hash,
            name,
        })
        .await
    {
        Ok(u) => u,
        // lost a race with a concurrent sign-up
        Err(StoreError::EmailTaken) => return Err(ApiError::bad_request(EMAIL_IN_USE)),
        Err(StoreError::Other(e)) => return Err(e.into()),
    };

    let token = issue_token(user.id);
    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (required(payload.email), required(payload.password))
    else {
        warn!("signin missing fields");
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "signin unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "signin invalid password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(user.id);
    info!(user_id = %user.id, email = %user.email, "user signed in");
    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}
