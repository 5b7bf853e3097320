//! Handlers for registration and login

use crate::core::auth;
use crate::core::error::ApiError;
use crate::core::user::{LoginRequest, RegisterRequest, User};
use crate::server::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};
use uuid::Uuid;

/// POST /register
///
/// Usernames are unique: a second registration under an existing username
/// is rejected outright. The lookup and the insert are two independent
/// operations, matching the consistency level of the rest of the service.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = request
        .username
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let full_name = request
        .full_name
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let password = request
        .password
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;

    if state.users.find_by_username(&username).await?.is_some() {
        return Err(ApiError::UsernameTaken);
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        full_name,
        password_hash: auth::hash_password(&password)?,
    };
    let user_id = user.id;

    state.users.insert(user).await?;

    tracing::info!(%user_id, "new user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New User Created",
            "userId": user_id,
        })),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (username, password) = match (
        request.username.filter(|s| !s.is_empty()),
        request.password.filter(|s| !s.is_empty()),
    ) {
        (Some(username), Some(password)) => (username, password),
        _ => return Err(ApiError::MissingCredentials),
    };

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    if !auth::verify_password(&password, &user.password_hash)? {
        return Err(ApiError::InvalidPassword);
    }

    let access_token = state.tokens.issue(user.id, &user.username)?;

    Ok(Json(json!({ "accessToken": access_token })))
}
