use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::residents;
use crate::models::document::ResidentInput;

pub struct ResidentRepository {
    conn: DatabaseConnection,
}

impl ResidentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Residents are matched by exact name and birth date; there is no
    /// national id on the report form.
    pub async fn find_by_identity_in<C: ConnectionTrait>(
        db: &C,
        full_name: &str,
        birth_date: &str,
    ) -> Result<Option<residents::Model>> {
        residents::Entity::find()
            .filter(residents::Column::FullName.eq(full_name))
            .filter(residents::Column::BirthDate.eq(birth_date))
            .order_by_asc(residents::Column::Id)
            .one(db)
            .await
            .context("Failed to look up resident")
    }

    pub async fn find_by_identity(
        &self,
        full_name: &str,
        birth_date: &str,
    ) -> Result<Option<residents::Model>> {
        Self::find_by_identity_in(&self.conn, full_name, birth_date).await
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        national_id: String,
        input: &ResidentInput,
        now: &str,
    ) -> Result<residents::Model> {
        let active = residents::ActiveModel {
            national_id: Set(national_id),
            full_name: Set(input.full_name.clone()),
            birth_place: Set(input.birth_place.clone()),
            birth_date: Set(input.birth_date.clone()),
            sex: Set(input.sex.clone()),
            religion: Set(input.religion.clone()),
            occupation: Set(input.occupation.clone()),
            address: Set(input.address.clone()),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            ..Default::default()
        };

        active.insert(db).await.context("Failed to insert resident")
    }

    /// Overwrites the personal particulars; the national id is left alone.
    pub async fn update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        input: &ResidentInput,
        now: &str,
    ) -> Result<()> {
        let resident = residents::Entity::find_by_id(id)
            .one(db)
            .await
            .context("Failed to load resident for update")?
            .ok_or_else(|| anyhow::anyhow!("Resident {id} not found"))?;

        let mut active: residents::ActiveModel = resident.into();
        active.full_name = Set(input.full_name.clone());
        active.birth_place = Set(input.birth_place.clone());
        active.birth_date = Set(input.birth_date.clone());
        active.sex = Set(input.sex.clone());
        active.religion = Set(input.religion.clone());
        active.occupation = Set(input.occupation.clone());
        active.address = Set(input.address.clone());
        active.updated_at = Set(now.to_string());
        active.update(db).await.context("Failed to update resident")?;

        Ok(())
    }
}
