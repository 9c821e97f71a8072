//! Authentication API endpoints
//!
//! Provides the login form metadata, login, and user info endpoints for
//! JWT-based authentication.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::presentation::{login_form, FormPresentation};
use crate::domain::user::User;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login/form", get(get_login_form))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub expires_at: String,
}

/// User response (safe to expose)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserResponse {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().map(String::from),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            status: user.status().as_str().to_string(),
            created_at: user.created_at().to_rfc3339(),
            last_login_at: user.last_login_at().map(|t| t.to_rfc3339()),
        }
    }
}

/// Presentation metadata for the login form
///
/// GET /auth/login/form
pub async fn get_login_form() -> Json<FormPresentation> {
    Json(login_form())
}

/// Login with username and password
///
/// POST /auth/login
///
/// Returns a JWT token on successful authentication.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let token = state.jwt_service.generate(&user)?;

    let expires_at = Utc::now() + Duration::hours(state.jwt_service.expiration_hours() as i64);

    info!(user_id = %user.id(), "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from_user(&user),
        expires_at: expires_at.to_rfc3339(),
    }))
}

/// Get current authenticated user
///
/// GET /auth/me
pub async fn get_current_user(
    RequireUser(user): RequireUser,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(UserResponse::from_user(&user)))
}
