use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub date_created: NaiveDateTime,
}

impl User {
    // Найти пользователя по email
    pub async fn find_by_email(email: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn find_by_id(id: i64, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&db.pool)
            .await
    }

    pub async fn create(
        name: &str,
        email: &str,
        password_hash: &str,
        db: &Database,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (name, email, password_hash, is_admin) VALUES ($1, $2, $3, 0)
             RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&db.pool)
        .await
    }

    pub fn verify_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}

/// Identity resolved for the current request. Guests carry no user id or
/// email; the booking engine only ever consumes this view.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Identity {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: Some(user.id),
            email: Some(user.email.clone()),
            is_admin: user.is_admin,
        }
    }
}
