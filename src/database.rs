use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("./src/migrations").run(&self.pool).await?;
        info!("Migrations completed");
        Ok(())
    }

    // Гарантируем хотя бы одного администратора в системе
    pub async fn ensure_admin_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(), anyhow::Error> {
        let admins: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = 1")
                .fetch_one(&self.pool)
                .await?;

        if admins == 0 {
            let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
            sqlx::query(
                "INSERT INTO users (name, email, password_hash, is_admin) VALUES ($1, $2, $3, 1)",
            )
            .bind("Admin")
            .bind(email)
            .bind(hash)
            .execute(&self.pool)
            .await?;
            info!("Created admin user: {}", email);
        }

        Ok(())
    }
}
