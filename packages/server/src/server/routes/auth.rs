//! Registration, login, and current-user endpoints.

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domains::users::{User, UserData};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
pub async fn register_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("All fields are required"));
    }
    if name.len() > 50 {
        return Err(ApiError::bad_request("Name cannot exceed 50 characters"));
    }
    if !is_plausible_email(&email) {
        return Err(ApiError::bad_request("Please enter a valid email"));
    }
    if body.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters long",
        ));
    }

    if User::find_by_email(&email, &state.db_pool).await?.is_some() {
        return Err(ApiError::bad_request("User already exists with this email"));
    }

    let password_hash = User::hash_password(&body.password)?;
    let user = User::create(name, &email, &password_hash, &state.db_pool).await?;

    let token = state.jwt_service.create_token(user.id, user.email.clone())?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "data": UserData::from(user),
        })),
    ))
}

/// POST /api/auth/login
pub async fn login_handler(
    Extension(state): Extension<AxumAppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = User::find_by_email(body.email.trim(), &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.verify_password(&body.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state.jwt_service.create_token(user.id, user.email.clone())?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "data": UserData::from(user),
    })))
}

/// GET /api/auth/me
pub async fn me_handler(
    Extension(state): Extension<AxumAppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let user = User::find_by_id(auth.user_id, &state.db_pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": UserData::from(user),
    })))
}

/// Cheap shape check; real validation is the verification email we don't send.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
