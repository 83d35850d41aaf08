use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use std::collections::HashMap;

use crate::entities::configurations;

pub struct ConfigRepository {
    conn: DatabaseConnection,
}

impl ConfigRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_all(&self) -> Result<HashMap<String, String>> {
        let rows = configurations::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to load configuration")?;

        Ok(rows.into_iter().map(|row| (row.key, row.value)).collect())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = configurations::Entity::find_by_id(key.to_string())
            .one(&self.conn)
            .await
            .with_context(|| format!("Failed to load configuration key '{key}'"))?;

        Ok(row.map(|row| row.value))
    }

    /// Upserts every pair in a single transaction.
    pub async fn set_many(&self, values: &HashMap<String, String>) -> Result<()> {
        let txn = self.conn.begin().await?;
        Self::upsert_all(&txn, values).await?;
        txn.commit().await?;
        Ok(())
    }

    /// Upserts on the caller's connection, so it can join a wider transaction.
    pub async fn upsert_all<C: ConnectionTrait>(
        db: &C,
        values: &HashMap<String, String>,
    ) -> Result<()> {
        for (key, value) in values {
            let row = configurations::ActiveModel {
                key: Set(key.clone()),
                value: Set(value.clone()),
            };

            configurations::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(configurations::Column::Key)
                        .update_column(configurations::Column::Value)
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
                .with_context(|| format!("Failed to save configuration key '{key}'"))?;
        }

        Ok(())
    }
}
