use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::contracts::UserRepository;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

const USER_COLUMNS: &str = "id, first_name, last_name, user_name, email, phone_number, password_hash, \
                            refresh_token, refresh_token_expiry_time";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE normalized_user_name = UPPER($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(user_name).fetch_optional(&self.pool).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE normalized_email = UPPER($1)", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).bind(email).fetch_optional(&self.pool).await?)
    }

    async fn create_user(&self, user: &User, roles: &[String]) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, user_name, normalized_user_name, email, \
             normalized_email, phone_number, password_hash) \
             VALUES ($1, $2, $3, $4, UPPER($4), $5, UPPER($5), $6, $7)",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.phone_number)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseManager::map_unique_violation(e, format!("User '{}' already exists", user.user_name)))?;

        for role in roles {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) \
                 SELECT $1, id FROM roles WHERE normalized_name = UPPER($2) ON CONFLICT DO NOTHING",
            )
            .bind(user.id)
            .bind(role)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>, DatabaseError> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = $1 ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn role_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE normalized_name = UPPER($1))")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET refresh_token = $2, \
             refresh_token_expiry_time = COALESCE($3, refresh_token_expiry_time) WHERE id = $1",
        )
        .bind(user_id)
        .bind(token)
        .bind(expiry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
