use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::database::Database;
use crate::models::{Movie, SeatPos};

/// Process-wide snapshot of movies with their seat grids.
///
/// All access goes through this service; reads return owned clones, never a
/// live reference into the shared state. The booking engine is the only
/// caller of the incremental `set_seat` path, everything else that changes
/// movie identity or seat state goes through a full `refresh`, which is also
/// the recovery mechanism if cache and store ever diverge.
#[derive(Clone)]
pub struct CacheService {
    db: Database,
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl CacheService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            movies: Arc::new(RwLock::new(Vec::new())),
        }
    }

    // Прогрев кеша при старте
    pub async fn warmup(&self) {
        info!("Starting cache warmup...");
        match self.refresh().await {
            Ok(count) => info!("Loaded {} movies into cache", count),
            Err(e) => warn!("Cache warmup failed: {:?}", e),
        }
        info!("Cache warmup done");
    }

    /// Rebuilds the whole cached list from the store: every movie, then every
    /// seat row per movie. Seat rows outside the fixed grid are ignored.
    pub async fn refresh(&self) -> Result<usize, sqlx::Error> {
        let mut movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, time, duration, image, price FROM movies ORDER BY id",
        )
        .fetch_all(&self.db.pool)
        .await?;

        for movie in &mut movies {
            let seats = sqlx::query_as::<_, (i32, i32, bool)>(
                "SELECT row, col, is_booked FROM seats WHERE movie_id = $1",
            )
            .bind(movie.id)
            .fetch_all(&self.db.pool)
            .await?;

            for (row, col, is_booked) in seats {
                // SeatGrid::set отбрасывает координаты вне сетки
                movie.seats.set(SeatPos::new(row, col), is_booked);
            }
        }

        let count = movies.len();
        self.replace_all(movies).await;
        Ok(count)
    }

    // Заменить весь список целиком
    pub async fn replace_all(&self, movies: Vec<Movie>) {
        *self.movies.write().await = movies;
    }

    /// Snapshot of every cached movie.
    pub async fn list(&self) -> Vec<Movie> {
        self.movies.read().await.clone()
    }

    /// Snapshot of one movie.
    pub async fn get(&self, movie_id: i64) -> Option<Movie> {
        self.movies
            .read()
            .await
            .iter()
            .find(|m| m.id == movie_id)
            .cloned()
    }

    /// Incremental seat flip, used by the booking engine after a successful
    /// store commit.
    pub async fn set_seat(&self, movie_id: i64, pos: SeatPos, booked: bool) {
        let mut movies = self.movies.write().await;
        if let Some(movie) = movies.iter_mut().find(|m| m.id == movie_id) {
            movie.seats.set(pos, booked);
        }
    }
}
