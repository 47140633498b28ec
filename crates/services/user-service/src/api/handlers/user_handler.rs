//! User management handlers.

use std::borrow::Cow;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::{ApiPath, ValidatedJson};
use crate::api::AppState;
use common::{AppResult, OptionExt};
use domain::{User, UserDetails, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH};

/// Create or update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Unique login name
    #[validate(custom(function = "valid_username"))]
    #[schema(example = "alice", max_length = 50)]
    pub username: String,
    /// Unique email address
    #[validate(
        email(message = "Invalid email format"),
        custom(function = "valid_email_length")
    )]
    #[schema(example = "alice@example.com", max_length = 100)]
    pub email: String,
    /// Given name
    #[validate(custom(function = "valid_first_name"))]
    #[schema(example = "Alice", max_length = 50)]
    pub first_name: String,
    /// Family name
    #[validate(custom(function = "valid_last_name"))]
    #[schema(example = "Liddell", max_length = 50)]
    pub last_name: String,
}

/// Require a non-blank value of at most `max` characters
fn check_text(value: &str, max: u64, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Owned(format!("{} must not be blank", label))));
    }
    if value.chars().count() as u64 > max {
        return Err(ValidationError::new("length")
            .with_message(Cow::Owned(format!("{} must be at most {} characters", label, max))));
    }
    Ok(())
}

fn valid_username(value: &str) -> Result<(), ValidationError> {
    check_text(value, MAX_USERNAME_LENGTH, "Username")
}

fn valid_email_length(value: &str) -> Result<(), ValidationError> {
    check_text(value, MAX_EMAIL_LENGTH, "Email")
}

fn valid_first_name(value: &str) -> Result<(), ValidationError> {
    check_text(value, MAX_NAME_LENGTH, "First name")
}

fn valid_last_name(value: &str) -> Result<(), ValidationError> {
    check_text(value, MAX_NAME_LENGTH, "Last name")
}

impl From<UserRequest> for UserDetails {
    fn from(req: UserRequest) -> Self {
        UserDetails::new(req.username, req.email, req.first_name, req.last_name)
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/username/:username", get(get_user_by_username))
        .route("/email/:email", get(get_user_by_email))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users in ascending id order", body = Vec<User>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<User>> {
    let user = state
        .user_service
        .get_user_by_id(id)
        .await?
        .ok_or_not_found(format!("User not found with id: {}", id))?;

    Ok(Json(user))
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
) -> AppResult<Json<User>> {
    let user = state
        .user_service
        .get_user_by_username(&username)
        .await?
        .ok_or_not_found(format!("User not found with username: {}", username))?;

    Ok(Json(user))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> AppResult<Json<User>> {
    let user = state
        .user_service
        .get_user_by_email(&email)
        .await?
        .ok_or_not_found(format!("User not found with email: {}", email))?;

    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let candidate = User::from(UserDetails::from(payload));
    let user = state.user_service.create_user(candidate).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<User>> {
    let user = state
        .user_service
        .update_user(id, UserDetails::from(payload))
        .await?;

    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
