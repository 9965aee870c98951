pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;

// Shared state для всего приложения
pub struct AppState {
    pub db: database::Database,
    pub cache: cache::CacheService,
    pub booking: services::BookingEngine,
    pub movies: services::MovieService,
    pub images: services::ImageStore,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<std::sync::Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;
        db.ensure_admin_user(&config.admin.email, &config.admin.password)
            .await?;

        let cache = cache::CacheService::new(db.clone());
        let booking = services::BookingEngine::new(db.clone(), cache.clone());
        let movies = services::MovieService::new(db.clone(), cache.clone());
        let images = services::ImageStore::new(&config.media.image_dir);
        images.init().await?;

        Ok(std::sync::Arc::new(Self {
            db,
            cache,
            booking,
            movies,
            images,
            config,
        }))
    }
}
