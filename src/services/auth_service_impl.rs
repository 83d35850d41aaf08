//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::UserId;
use crate::domain::clock::{Clock, format_timestamp};
use crate::services::audit::{AuditSink, actions};
use crate::services::auth_service::{AuthError, AuthService, UserInfo, validate_new_password};

pub struct SeaOrmAuthService {
    store: Store,
    audit: AuditSink,
    clock: Arc<dyn Clock>,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        audit: AuditSink,
        clock: Arc<dyn Clock>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            audit,
            clock,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, nrp: &str, password: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .user_repo()
            .verify_password(nrp.trim(), password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Only reported once the password has matched.
        if !user.is_active() {
            warn!(user_id = user.id, "Login attempt on deactivated account");
            return Err(AuthError::Deactivated);
        }

        info!(user_id = user.id, "User logged in");
        self.audit.log(
            UserId::new(user.id),
            actions::LOGIN,
            format!("{} logged in", user.full_name),
        );

        Ok(UserInfo::from(user))
    }

    async fn get_user(&self, id: UserId) -> Result<UserInfo, AuthError> {
        self.store
            .get_user(id.value())
            .await?
            .filter(crate::db::User::is_active)
            .map(UserInfo::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn change_password(
        &self,
        id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_new_password(current_password, new_password)?;

        let repo = self.store.user_repo();
        if !repo.verify_password_by_id(id.value(), current_password).await? {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        let now = format_timestamp(self.clock.now());
        repo.update_password(id.value(), new_password, &self.security, &now)
            .await?;

        info!(user_id = %id, "Password changed");
        Ok(())
    }
}
