//! User authentication extractor using JWT bearer tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

/// Extractor that requires `Authorization: Bearer <jwt>` for an active user
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state
            .jwt_service
            .validate(&token)
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?;

        debug!(username = %claims.username, "Bearer token accepted");

        let user_id = claims
            .user_id()
            .map_err(|_| ApiError::unauthorized("Invalid token subject"))?;

        let user = state
            .user_service
            .get(&user_id.to_string())
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active() {
            return Err(ApiError::unauthorized("User account is suspended"));
        }

        Ok(RequireUser(user))
    }
}

/// Extract the bearer token from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>'",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let token = extract_jwt_token(&headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.test")).unwrap();
        assert_eq!(token, "eyJhbGciOiJIUzI1NiJ9.test");
    }

    #[test]
    fn test_missing_token() {
        let err = extract_jwt_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_basic_scheme_is_rejected() {
        assert!(extract_jwt_token(&headers_with("Basic dXNlcjpwYXNz")).is_err());
    }

    #[test]
    fn test_token_is_trimmed() {
        let token = extract_jwt_token(&headers_with("Bearer   token-with-spaces   ")).unwrap();
        assert_eq!(token, "token-with-spaces");
    }
}
