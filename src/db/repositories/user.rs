use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users::{self, Role};

/// Account data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub nrp: String,
    pub rank: String,
    pub position: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl User {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            nrp: model.nrp,
            rank: model.rank,
            position: model.position,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub nrp: String,
    pub rank: String,
    pub position: String,
    pub role: Role,
    pub password: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_nrp(&self, nrp: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Nrp.eq(nrp))
            .one(&self.conn)
            .await
            .context("Failed to query user by NRP")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.conn)
            .await
            .context("Failed to query users by ID")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// All accounts, deactivated ones included.
    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::FullName)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn list_active_operators(&self) -> Result<Vec<User>> {
        let rows = users::Entity::find()
            .filter(users::Column::Role.eq(Role::Operator))
            .filter(users::Column::DeletedAt.is_null())
            .order_by_asc(users::Column::FullName)
            .all(&self.conn)
            .await
            .context("Failed to list operators")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    pub async fn count_active(&self) -> Result<u64> {
        users::Entity::find()
            .filter(users::Column::DeletedAt.is_null())
            .count(&self.conn)
            .await
            .context("Failed to count active users")
    }

    /// Inserts a new account. Generic over the connection so the first
    /// super-admin can be created inside the setup transaction.
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        new_user: NewUser,
        security: &SecurityConfig,
        now: &str,
    ) -> Result<User> {
        let password = new_user.password;
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            full_name: Set(new_user.full_name),
            nrp: Set(new_user.nrp),
            rank: Set(new_user.rank),
            position: Set(new_user.position),
            role: Set(new_user.role),
            password_hash: Set(password_hash),
            created_at: Set(now.to_string()),
            updated_at: Set(now.to_string()),
            deleted_at: Set(None),
            ..Default::default()
        };

        let model = active.insert(db).await.context("Failed to insert user")?;
        Ok(User::from(model))
    }

    /// Returns the account when `password` matches its hash, whether or not
    /// the account is active.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, nrp: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Nrp.eq(nrp))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        if verify_hash(user.password_hash.clone(), password).await? {
            Ok(Some(User::from(user)))
        } else {
            Ok(None)
        }
    }

    pub async fn verify_password_by_id(&self, id: i32, password: &str) -> Result<bool> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        match user {
            Some(user) => verify_hash(user.password_hash, password).await,
            None => Ok(false),
        }
    }

    pub async fn update_password(
        &self,
        id: i32,
        new_password: &str,
        security: &SecurityConfig,
        now: &str,
    ) -> Result<()> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let security = security.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now.to_string());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// `Some(ts)` deactivates the account, `None` reactivates it.
    pub async fn set_deactivated(&self, id: i32, deleted_at: Option<String>, now: &str) -> Result<bool> {
        let Some(user) = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user for activation change")?
        else {
            return Ok(false);
        };

        let mut active: users::ActiveModel = user.into();
        active.deleted_at = Set(deleted_at);
        active.updated_at = Set(now.to_string());
        active.update(&self.conn).await?;

        Ok(true)
    }
}

async fn verify_hash(password_hash: String, password: &str) -> Result<bool> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
