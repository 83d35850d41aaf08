//! Account administration for super-admins.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::UserId;
use crate::entities::users::Role;
use crate::services::auth_service::UserInfo;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub nrp: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub password: String,
}

const fn default_role() -> Role {
    Role::Operator
}

impl CreateUserRequest {
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.nrp = self.nrp.trim().to_string();
        self.rank = self.rank.trim().to_string();
        self.position = self.position.trim().to_string();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.is_empty() {
            return Err("Full name is required".to_string());
        }
        if self.nrp.is_empty() {
            return Err("NRP is required".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Every account, deactivated ones included.
    async fn list_users(&self) -> Result<Vec<UserInfo>, UserError>;

    /// Active operators, for the official pickers on a letter.
    async fn list_operators(&self) -> Result<Vec<UserInfo>, UserError>;

    async fn create_user(
        &self,
        request: CreateUserRequest,
        actor: UserId,
    ) -> Result<UserInfo, UserError>;

    /// Soft-deletes the account. An actor cannot deactivate themselves.
    async fn deactivate(&self, id: UserId, actor: UserId) -> Result<(), UserError>;

    async fn activate(&self, id: UserId, actor: UserId) -> Result<(), UserError>;
}
