use chrono::{Duration, NaiveDateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Database;
use crate::models::User;

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: NaiveDateTime,
}

impl Session {
    // Выдать новый opaque токен на ttl_hours
    pub async fn create(
        user_id: i64,
        ttl_hours: i64,
        db: &Database,
    ) -> Result<String, sqlx::Error> {
        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now().naive_utc() + Duration::hours(ttl_hours);

        sqlx::query("INSERT INTO sessions (user_id, token, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&token)
            .bind(expires_at)
            .execute(&db.pool)
            .await?;

        Ok(token)
    }

    /// Resolves a token to its user. Expired sessions resolve to nothing;
    /// session validity is strictly `now < expires_at`.
    pub async fn resolve_user(token: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.email, u.password_hash, u.is_admin, u.date_created
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = $1 AND s.expires_at > $2",
        )
        .bind(token)
        .bind(Utc::now().naive_utc())
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn delete(token: &str, db: &Database) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&db.pool)
            .await?;
        Ok(())
    }

    // Удалить истекшие сессии, вернуть сколько снесли
    pub async fn purge_expired(db: &Database) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now().naive_utc())
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
