use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::audit_logs;

pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, user_id: i32, action: &str, detail: &str, timestamp: &str) -> Result<()> {
        let active_model = audit_logs::ActiveModel {
            user_id: Set(user_id),
            action: Set(action.to_string()),
            detail: Set(detail.to_string()),
            timestamp: Set(timestamp.to_string()),
            ..Default::default()
        };

        audit_logs::Entity::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert audit log")?;
        Ok(())
    }

    /// Newest first.
    pub async fn list_all(&self) -> Result<Vec<audit_logs::Model>> {
        audit_logs::Entity::find()
            .order_by_desc(audit_logs::Column::Timestamp)
            .order_by_desc(audit_logs::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list audit logs")
    }
}
