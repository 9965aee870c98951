use tracing::{info, warn};

use crate::cache::CacheService;
use crate::database::Database;
use crate::models::{Movie, MovieInput, SeatPos, GRID_COLS, GRID_ROWS};

/// Admin-side movie management. Every mutation here goes through the store
/// and then a full cache refresh, the safe path for anything that changes
/// movie identity or seat structure.
#[derive(Clone)]
pub struct MovieService {
    db: Database,
    cache: CacheService,
}

impl MovieService {
    pub fn new(db: Database, cache: CacheService) -> Self {
        Self { db, cache }
    }

    /// Inserts a movie and provisions its full 8x10 seat grid in the same
    /// transaction. Seats are only ever created here, never individually.
    pub async fn create(&self, input: &MovieInput) -> Result<i64, sqlx::Error> {
        let mut tx = self.db.pool.begin().await?;

        let movie_id: i64 = sqlx::query_scalar(
            "INSERT INTO movies (title, time, duration, image, price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&input.title)
        .bind(&input.time)
        .bind(&input.duration)
        .bind(&input.image)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await?;

        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                sqlx::query(
                    "INSERT INTO seats (movie_id, row, col, is_booked) VALUES ($1, $2, $3, 0)",
                )
                .bind(movie_id)
                .bind(row)
                .bind(col)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.cache.refresh().await?;
        info!("Created movie {} '{}'", movie_id, input.title);
        Ok(movie_id)
    }

    // Обновляются только скалярные поля, сетка мест не трогается
    pub async fn update(&self, movie_id: i64, input: &MovieInput) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE movies SET title = $1, time = $2, duration = $3, image = $4, price = $5
             WHERE id = $6",
        )
        .bind(&input.title)
        .bind(&input.time)
        .bind(&input.duration)
        .bind(&input.image)
        .bind(input.price)
        .bind(movie_id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        self.cache.refresh().await?;
        Ok(true)
    }

    pub async fn set_image(&self, movie_id: i64, image: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE movies SET image = $1 WHERE id = $2")
            .bind(image)
            .bind(movie_id)
            .execute(&self.db.pool)
            .await?;
        self.cache.refresh().await?;
        Ok(())
    }

    // Каскад в схеме удаляет места, брони и booking_seats
    pub async fn delete(&self, movie_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(movie_id)
            .execute(&self.db.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        self.cache.refresh().await?;
        info!("Deleted movie {}", movie_id);
        Ok(true)
    }

    /// Title search. The empty query is the common case and is served
    /// straight from the cache snapshot; anything else hits the store.
    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, sqlx::Error> {
        if query.is_empty() {
            return Ok(self.cache.list().await);
        }

        let mut movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, time, duration, image, price FROM movies
             WHERE title LIKE $1 ORDER BY id",
        )
        .bind(format!("%{}%", query))
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
                movie.seats.set(SeatPos::new(row, col), is_booked);
            }
        }

        Ok(movies)
    }

    // Стартовый каталог, когда база пустая
    pub async fn seed_sample_movies(&self) -> Result<(), sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.db.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        info!("No movies found, seeding sample catalog");

        let samples: [(&str, &str, &str, f64); 9] = [
            ("Spider-Man: No Way Home", "2023-08-01 18:00", "2h 28m", 14.99),
            ("Dead Poets Society", "2023-08-02 16:30", "2h 8m", 11.99),
            ("The Shawshank Redemption", "2023-08-03 19:15", "2h 22m", 12.99),
            ("Inception", "2023-08-04 20:30", "2h 28m", 13.99),
            ("The Matrix", "2023-08-01 21:15", "2h 16m", 12.99),
            ("Interstellar", "2023-08-02 19:00", "2h 49m", 15.99),
            ("Pulp Fiction", "2023-08-03 20:00", "2h 34m", 13.50),
            ("The Dark Knight", "2023-08-04 18:45", "2h 32m", 14.50),
            ("Parasite", "2023-08-05 17:30", "2h 12m", 13.99),
        ];

        for (i, (title, time, duration, price)) in samples.iter().enumerate() {
            let input = MovieInput {
                title: title.to_string(),
                time: time.to_string(),
                duration: duration.to_string(),
                price: *price,
                image: Some(format!("/static/images/movie_{}.jpg", i + 1)),
            };
            if let Err(e) = self.create(&input).await {
                warn!("Failed to seed movie '{}': {:?}", title, e);
            }
        }

        Ok(())
    }
}
