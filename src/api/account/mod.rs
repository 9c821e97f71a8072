//! Account API endpoints
//!
//! Sign-up form metadata, sign-up validation and registration, and the
//! e-mail and phone contact forms.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, ValidationFailure};
use crate::domain::contact::{EmailAddressForm, PhoneNumberForm};
use crate::domain::presentation::{email_form, phone_form, signup_form, FormPresentation};
use crate::domain::registration::{
    CleanedRegistration, Contact, FieldError, RegistrationOutcome, RegistrationPayload,
};
use crate::infrastructure::account::RegistrationResult;

/// Create the account router
pub fn create_account_router() -> Router<AppState> {
    Router::new()
        .route("/signup/form", get(get_signup_form))
        .route("/signup/validate", post(validate_signup))
        .route("/signup", post(signup))
        .route("/contact/email", get(get_email_form).post(submit_email))
        .route("/contact/phone", get(get_phone_form).post(submit_phone))
}

/// Cleaned sign-up values; passwords are never echoed back
#[derive(Debug, Serialize)]
pub struct CleanedRegistrationResponse {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email_phone: String,
    pub contact: Contact,
}

impl CleanedRegistrationResponse {
    fn from_cleaned(cleaned: &CleanedRegistration) -> Self {
        Self {
            first_name: cleaned.first_name().to_string(),
            last_name: cleaned.last_name().to_string(),
            username: cleaned.username().to_string(),
            email_phone: cleaned.email_phone().to_string(),
            contact: cleaned.contact(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateSignupResponse {
    pub valid: bool,
    pub cleaned: CleanedRegistrationResponse,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct PhoneResponse {
    pub phone: String,
}

/// GET /account/signup/form
pub async fn get_signup_form() -> Json<FormPresentation> {
    Json(signup_form())
}

/// GET /account/contact/email
pub async fn get_email_form() -> Json<FormPresentation> {
    Json(email_form())
}

/// GET /account/contact/phone
pub async fn get_phone_form() -> Json<FormPresentation> {
    Json(phone_form())
}

/// Validate a sign-up without storing anything
///
/// POST /account/signup/validate
pub async fn validate_signup(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationPayload>,
) -> Result<Response, ApiError> {
    let response = match state.account_service.validate(&payload).await? {
        RegistrationOutcome::Valid(cleaned) => Json(ValidateSignupResponse {
            valid: true,
            cleaned: CleanedRegistrationResponse::from_cleaned(&cleaned),
        })
        .into_response(),
        RegistrationOutcome::Invalid(errors) => ValidationFailure::new(errors).into_response(),
    };

    Ok(response)
}

/// Validate a sign-up and create the account
///
/// POST /account/signup
///
/// Returns 201 with the stored user (and customer for phone sign-ups).
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<RegistrationPayload>,
) -> Result<Response, ApiError> {
    let response = match state.account_service.register(&payload).await? {
        RegistrationResult::Registered(account) => {
            (StatusCode::CREATED, Json(account)).into_response()
        }
        RegistrationResult::Rejected(errors) => ValidationFailure::new(errors).into_response(),
    };

    Ok(response)
}

/// POST /account/contact/email
pub async fn submit_email(Json(form): Json<EmailAddressForm>) -> Response {
    match form.clean() {
        Ok(email) => Json(EmailResponse { email }).into_response(),
        Err(errors) => contact_failure("email", errors),
    }
}

/// POST /account/contact/phone
pub async fn submit_phone(Json(form): Json<PhoneNumberForm>) -> Response {
    match form.clean() {
        Ok(phone) => Json(PhoneResponse { phone }).into_response(),
        Err(errors) => contact_failure("phone", errors),
    }
}

fn contact_failure(field: &'static str, errors: Vec<FieldError>) -> Response {
    ValidationFailure::new(BTreeMap::from([(field, errors)])).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::test_support::{broken_state, seeded_state};

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn signup_body(username: &str, email_phone: &str) -> Value {
        json!({
            "first_name": "Ann",
            "last_name": "Lee",
            "username": username,
            "email_phone": email_phone,
            "password": "Str0ng!Pass9",
            "password_confirmation": "Str0ng!Pass9"
        })
    }

    async fn app() -> Router {
        create_account_router().with_state(seeded_state().await)
    }

    #[tokio::test]
    async fn test_signup_form_metadata() {
        let request = Request::builder()
            .uri("/signup/form")
            .body(Body::empty())
            .unwrap();
        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let fields = body["fields"].as_array().unwrap();

        assert_eq!(fields.len(), 6);
        assert!(fields.iter().all(|f| f["css_class"] == "form-control"));
        let email_phone = fields.iter().find(|f| f["name"] == "email_phone").unwrap();
        assert_eq!(email_phone["readonly"], true);
    }

    #[tokio::test]
    async fn test_validate_returns_cleaned_fields_without_passwords() {
        let (status, body) = post_json(
            app().await,
            "/signup/validate",
            signup_body("carol", " c@x.com "),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
        assert_eq!(body["cleaned"]["username"], "carol");
        assert_eq!(body["cleaned"]["email_phone"], "c@x.com");
        assert_eq!(body["cleaned"]["contact"]["kind"], "email");
        assert!(body["cleaned"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_validate_reports_duplicate_username() {
        let (status, body) = post_json(
            app().await,
            "/signup/validate",
            signup_body("Alice", "new@x.com"),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_object().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["username"][0]["code"], "duplicate_username");
    }

    #[tokio::test]
    async fn test_validate_missing_fields_are_required() {
        let (status, body) = post_json(app().await, "/signup/validate", json!({})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        for field in ["first_name", "last_name", "username", "email_phone", "password"] {
            assert_eq!(body["errors"][field][0]["code"], "required", "{}", field);
        }
    }

    #[tokio::test]
    async fn test_signup_with_email_creates_user() {
        let (status, body) =
            post_json(app().await, "/signup", signup_body("carol", "c@x.com")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "carol");
        assert_eq!(body["user"]["email"], "c@x.com");
        assert!(body.get("customer").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_signup_with_phone_creates_customer() {
        let (status, body) =
            post_json(app().await, "/signup", signup_body("dave_p", "09350000000")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["user"].get("email").is_none());
        assert_eq!(body["customer"]["phone"], "09350000000");
    }

    #[tokio::test]
    async fn test_signup_duplicate_phone() {
        let (status, body) =
            post_json(app().await, "/signup", signup_body("eve_p", "09123456789")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["email_phone"][0]["code"], "duplicate_phone");
    }

    #[tokio::test]
    async fn test_signup_twice_rejects_second() {
        let app = app().await;

        let (first, _) = post_json(app.clone(), "/signup", signup_body("carol", "c@x.com")).await;
        let (second, body) = post_json(app, "/signup", signup_body("CAROL", "c2@x.com")).await;

        assert_eq!(first, StatusCode::CREATED);
        assert_eq!(second, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["username"][0]["code"], "duplicate_username");
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let app = create_account_router().with_state(broken_state().await);

        let (status, body) =
            post_json(app, "/signup/validate", signup_body("carol", "09350000000")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["type"], "server_error");
    }

    #[tokio::test]
    async fn test_contact_email_cleans_domain() {
        let (status, body) = post_json(
            app().await,
            "/contact/email",
            json!({ "email": " Ann@Example.COM " }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "Ann@example.com");
    }

    #[tokio::test]
    async fn test_contact_email_invalid() {
        let (status, body) =
            post_json(app().await, "/contact/email", json!({ "email": "nope" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["email"][0]["code"], "invalid_email");
    }

    #[tokio::test]
    async fn test_contact_phone() {
        let (ok, body) =
            post_json(app().await, "/contact/phone", json!({ "phone": "09123456789" })).await;
        assert_eq!(ok, StatusCode::OK);
        assert_eq!(body["phone"], "09123456789");

        let (bad, body) =
            post_json(app().await, "/contact/phone", json!({ "phone": "9123456789" })).await;
        assert_eq!(bad, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["phone"][0]["code"], "invalid_phone");
    }

    #[tokio::test]
    async fn test_contact_phone_missing_is_required() {
        let (status, body) = post_json(app().await, "/contact/phone", json!({})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["phone"][0]["code"], "required");
    }
}
