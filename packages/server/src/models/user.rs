use common::user::{CreateUserRequest, Role, SignInRequest, UserProfile};

use crate::entity::user;
use crate::error::AppError;

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name is missing!".into()));
    }
    let email = payload.email.trim();
    if !looks_like_email(email) {
        return Err(AppError::Validation("Email is invalid!".into()));
    }
    let len = payload.password.chars().count();
    if !(8..=128).contains(&len) {
        return Err(AppError::Validation(
            "Password must be 8 to 128 characters long!".into(),
        ));
    }
    Ok(())
}

pub fn validate_sign_in(payload: &SignInRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation("email/password missing!".into()));
    }
    Ok(())
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl From<user::Model> for UserProfile {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id.to_string(),
            role: Role::from_stored(&m.role),
            name: m.name,
            email: m.email,
        }
    }
}
