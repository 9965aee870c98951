#![allow(dead_code)]

use cinema_booking::cache::CacheService;
use cinema_booking::database::Database;
use cinema_booking::models::{Identity, MovieInput, SeatPos};
use cinema_booking::services::{BookingEngine, MovieService};

pub async fn test_db() -> Database {
    // In-memory SQLite; one connection so every query sees the same database
    let db = Database::new("sqlite::memory:", 1)
        .await
        .expect("failed to open in-memory database");
    db.run_migrations().await.expect("migrations failed");
    db
}

pub struct TestApp {
    pub db: Database,
    pub cache: CacheService,
    pub engine: BookingEngine,
    pub movies: MovieService,
}

pub async fn test_app() -> TestApp {
    let db = test_db().await;
    let cache = CacheService::new(db.clone());
    let engine = BookingEngine::new(db.clone(), cache.clone());
    let movies = MovieService::new(db.clone(), cache.clone());
    TestApp {
        db,
        cache,
        engine,
        movies,
    }
}

pub async fn add_movie(app: &TestApp, title: &str, price: f64) -> i64 {
    app.movies
        .create(&MovieInput {
            title: title.to_string(),
            time: "2026-09-01 20:00".to_string(),
            duration: "2h 10m".to_string(),
            price,
            image: None,
        })
        .await
        .expect("failed to create movie")
}

pub fn seats(raw: &[&str]) -> Vec<SeatPos> {
    raw.iter().map(|s| s.parse().expect("bad seat literal")).collect()
}

pub fn guest() -> Identity {
    Identity::guest()
}

pub fn admin() -> Identity {
    Identity {
        user_id: Some(1),
        email: Some("admin@example.com".to_string()),
        is_admin: true,
    }
}

pub async fn booked_count(db: &Database, movie_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM seats WHERE movie_id = $1 AND is_booked = 1")
        .bind(movie_id)
        .fetch_one(&db.pool)
        .await
        .expect("seat count query failed")
}
