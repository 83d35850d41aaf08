//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::repositories::user::UserRepository;
use crate::db::{NewUser, Store};
use crate::domain::UserId;
use crate::domain::clock::{Clock, format_timestamp};
use crate::services::audit::{AuditSink, actions};
use crate::services::auth_service::UserInfo;
use crate::services::user_service::{CreateUserRequest, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    audit: AuditSink,
    clock: Arc<dyn Clock>,
    security: SecurityConfig,
}

impl SeaOrmUserService {
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

    async fn set_active(&self, id: UserId, active: bool) -> Result<String, UserError> {
        let user = self
            .store
            .get_user(id.value())
            .await?
            .ok_or(UserError::NotFound(id))?;

        let now = format_timestamp(self.clock.now());
        let deleted_at = if active { None } else { Some(now.clone()) };

        self.store
            .user_repo()
            .set_deactivated(id.value(), deleted_at, &now)
            .await?;

        Ok(user.full_name)
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn list_users(&self) -> Result<Vec<UserInfo>, UserError> {
        let users = self.store.user_repo().list_all().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    async fn list_operators(&self) -> Result<Vec<UserInfo>, UserError> {
        let users = self.store.user_repo().list_active_operators().await?;
        Ok(users.into_iter().map(UserInfo::from).collect())
    }

    async fn create_user(
        &self,
        request: CreateUserRequest,
        actor: UserId,
    ) -> Result<UserInfo, UserError> {
        let request = request.normalized();
        request.validate().map_err(UserError::Validation)?;

        if self.store.get_user_by_nrp(&request.nrp).await?.is_some() {
            return Err(UserError::Conflict(format!(
                "NRP {} is already registered",
                request.nrp
            )));
        }

        let now = format_timestamp(self.clock.now());
        let user = UserRepository::create(
            &self.store.conn,
            NewUser {
                full_name: request.full_name,
                nrp: request.nrp,
                rank: request.rank,
                position: request.position,
                role: request.role,
                password: request.password,
            },
            &self.security,
            &now,
        )
        .await?;

        info!(user_id = user.id, actor = %actor, "User created");
        self.audit.log(
            actor,
            actions::CREATE_USER,
            format!(
                "Created {} account for {} ({})",
                user.role.as_str(),
                user.full_name,
                user.nrp
            ),
        );

        Ok(UserInfo::from(user))
    }

    async fn deactivate(&self, id: UserId, actor: UserId) -> Result<(), UserError> {
        if id == actor {
            return Err(UserError::Validation(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let name = self.set_active(id, false).await?;

        info!(user_id = %id, actor = %actor, "User deactivated");
        self.audit.log(
            actor,
            actions::DEACTIVATE_USER,
            format!("Deactivated account of {name}"),
        );
        Ok(())
    }

    async fn activate(&self, id: UserId, actor: UserId) -> Result<(), UserError> {
        let name = self.set_active(id, true).await?;

        info!(user_id = %id, actor = %actor, "User activated");
        self.audit.log(
            actor,
            actions::ACTIVATE_USER,
            format!("Activated account of {name}"),
        );
        Ok(())
    }
}
