use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use common::user::{
    CreateUserRequest, Role, SignInRequest, SignInResponse, SignedInUser, UserProfile,
    UserResponse,
};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::{normalize_email, validate_create_user, validate_sign_in};
use crate::state::AppState;
use crate::utils::{hash, jwt};

pub const EMAIL_IN_USE: &str = "This email is already in use!";

#[utoipa::path(
    post,
    path = "/create",
    tag = "Users",
    operation_id = "createUser",
    summary = "Create an account",
    description = "New accounts get the `user` role. Admin accounts come from the startup seed.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_user(&payload)?;

    let user = insert_user(&state.db, &payload, Role::User).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: UserProfile::from(user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/sign-in",
    tag = "Users",
    operation_id = "signIn",
    summary = "Sign in and receive a bearer token",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Missing email or password", body = ErrorBody),
        (status = 401, description = "Email/password mismatch", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    validate_sign_in(&payload)?;

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(normalize_email(&payload.email)))
        .one(&state.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let is_valid = hash::verify_password(&payload.password, &user.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;

    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let token = jwt::sign(
        &user.id.to_string(),
        &user.role,
        &state.config.auth.jwt_secret,
        state.config.auth.token_ttl_days,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

    let profile = UserProfile::from(user);
    tracing::info!(user_id = %profile.id, "User signed in");

    Ok(Json(SignInResponse {
        user: SignedInUser {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
            token,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/is-auth",
    tag = "Users",
    operation_id = "isAuth",
    summary = "Return the profile behind the bearer token",
    responses(
        (status = 200, description = "Authenticated user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn is_auth(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    // A token may outlive its account.
    let user = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .ok_or(AppError::TokenInvalid)?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// Insert an account with a hashed password, mapping a duplicate email to a conflict.
pub(crate) async fn insert_user<C: ConnectionTrait>(
    db: &C,
    payload: &CreateUserRequest,
    role: Role,
) -> Result<user::Model, AppError> {
    let email = normalize_email(&payload.email);

    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(EMAIL_IN_USE.into()));
    }

    let hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let new_user = user::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        password: Set(hash),
        role: Set(role.as_str().to_string()),
        created_at: Set(Utc::now()),
    };

    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Account creation race: unique constraint caught on insert");
            AppError::Conflict(EMAIL_IN_USE.into())
        }
        _ => AppError::from(e),
    })
}
