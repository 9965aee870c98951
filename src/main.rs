use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::task;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{config::Config, controllers, services::cleanup::CleanupService, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema booking service");

    // SQLite живет в файле - каталог должен существовать до коннекта
    tokio::fs::create_dir_all("data").await.ok();

    let app_state = AppState::new(config.clone()).await?;
    info!("Database connected");

    // Стартовый каталог фильмов, если база пустая
    app_state.movies.seed_sample_movies().await?;

    // Прогрев кеша
    app_state.cache.warmup().await;

    // --- Start background tasks ---

    // Периодическая чистка истекших сессий
    let cleanup = CleanupService::new(app_state.clone());
    task::spawn(cleanup.run());

    // --- Start the web server ---

    let app = Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        // Постеры фильмов
        .nest_service(
            "/static/images",
            ServeDir::new(app_state.images.serve_root()),
        )
        // Mount the routes from the controllers module
        .nest("/api", controllers::routes())
        .with_state(app_state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(config.app.host.parse()?, config.app.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
