//! Domain service for authentication.
//!
//! Handles login by NRP, the current-user lookup and password changes.
//! Sessions themselves are managed by the HTTP layer.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::domain::UserId;
use crate::entities::users::Role;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid NRP or password")]
    InvalidCredentials,

    #[error("This account has been deactivated. Contact a super admin")]
    Deactivated,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Account data exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub full_name: String,
    pub nrp: String,
    pub rank: String,
    pub position: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: UserId::new(user.id),
            is_active: user.is_active(),
            full_name: user.full_name,
            nrp: user.nrp,
            rank: user.rank,
            position: user.position,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// New passwords: at least 8 characters and different from the current one.
pub fn validate_new_password(current: &str, new: &str) -> Result<(), AuthError> {
    if new.len() < 8 {
        return Err(AuthError::Validation(
            "New password must be at least 8 characters".to_string(),
        ));
    }

    if current == new {
        return Err(AuthError::Validation(
            "New password must be different from current password".to_string(),
        ));
    }

    Ok(())
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown NRP or a wrong
    /// password and [`AuthError::Deactivated`] for a deactivated account.
    async fn login(&self, nrp: &str, password: &str) -> Result<UserInfo, AuthError>;

    /// Active account by id; deactivated accounts read as not found.
    async fn get_user(&self, id: UserId) -> Result<UserInfo, AuthError>;

    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new password is invalid.
    async fn change_password(
        &self,
        id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
