use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{error, info};

use crate::cache::CacheService;
use crate::database::Database;
use crate::models::{Identity, SeatPos};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("Movie not found")]
    MovieNotFound(i64),
    #[error("Seat {0} is out of bounds")]
    SeatOutOfBounds(SeatPos),
    #[error("Seat {0} is not available")]
    SeatUnavailable(SeatPos),
    #[error("Booking not found")]
    BookingNotFound(i64),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl BookingError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::MovieNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::SeatOutOfBounds(_) => StatusCode::BAD_REQUEST,
            BookingError::SeatUnavailable(_) => StatusCode::CONFLICT,
            BookingError::BookingNotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Unauthorized => StatusCode::FORBIDDEN,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> axum::response::Response {
        if let BookingError::Database(ref e) = self {
            error!("booking engine sql error: {:?}", e);
        }
        let body = json!({ "success": false, "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[derive(sqlx::FromRow)]
struct BookingHead {
    id: i64,
    user_id: Option<i64>,
    movie_id: i64,
    email: String,
}

/// Validates seat selections against the cached grid, persists bookings in a
/// single transaction and only then mirrors the change into the cache.
///
/// Bookings and cancellations for one movie serialize on a per-movie async
/// mutex held across the whole validate / persist / cache-update sequence, so
/// two requests can never both observe the same seat as free and commit.
/// Unrelated movies do not contend.
#[derive(Clone)]
pub struct BookingEngine {
    db: Database,
    cache: CacheService,
    locks: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl BookingEngine {
    pub fn new(db: Database, cache: CacheService) -> Self {
        Self {
            db,
            cache,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    // Мьютекс конкретного фильма; записи в карте живут до конца процесса
    fn movie_lock(&self, movie_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("movie lock map poisoned");
        locks.entry(movie_id).or_default().clone()
    }

    pub async fn create_booking(
        &self,
        movie_id: i64,
        name: &str,
        email: &str,
        seats: &[SeatPos],
        identity: &Identity,
    ) -> Result<i64, BookingError> {
        // Валидация запроса до каких-либо блокировок и мутаций
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(BookingError::Validation("Missing required fields".into()));
        }
        if seats.is_empty() {
            return Err(BookingError::Validation("No seats selected".into()));
        }
        let mut seen = HashSet::new();
        for seat in seats {
            if !seen.insert(*seat) {
                return Err(BookingError::Validation(format!(
                    "Seat {seat} requested more than once"
                )));
            }
        }

        let lock = self.movie_lock(movie_id);
        let _guard = lock.lock().await;

        // Проверки строго в порядке: фильм, границы, занятость
        let movie = self
            .cache
            .get(movie_id)
            .await
            .ok_or(BookingError::MovieNotFound(movie_id))?;

        for seat in seats {
            if !seat.in_bounds() {
                return Err(BookingError::SeatOutOfBounds(*seat));
            }
        }
        for seat in seats {
            if movie.seats.is_booked(*seat) {
                return Err(BookingError::SeatUnavailable(*seat));
            }
        }

        let total = movie.price * seats.len() as f64;

        // Одна транзакция на бронь: строка брони, флаги мест, строки booking_seats
        let mut tx = self.db.pool.begin().await?;

        let booking_id: i64 = sqlx::query_scalar(
            "INSERT INTO bookings (user_id, movie_id, name, email, total)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(identity.user_id)
        .bind(movie_id)
        .bind(name)
        .bind(email)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        for seat in seats {
            sqlx::query("UPDATE seats SET is_booked = 1 WHERE movie_id = $1 AND row = $2 AND col = $3")
                .bind(movie_id)
                .bind(seat.row)
                .bind(seat.col)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO booking_seats (booking_id, row, col) VALUES ($1, $2, $3)")
                .bind(booking_id)
                .bind(seat.row)
                .bind(seat.col)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        // Кеш трогаем только после успешного коммита
        for seat in seats {
            self.cache.set_seat(movie_id, *seat, true).await;
        }

        info!(
            "Created booking {} for movie {} ({} seats, total {:.2})",
            booking_id,
            movie_id,
            seats.len(),
            total
        );
        Ok(booking_id)
    }

    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        identity: &Identity,
    ) -> Result<(), BookingError> {
        let head = sqlx::query_as::<_, BookingHead>(
            "SELECT id, user_id, movie_id, email FROM bookings WHERE id = $1",
        )
        .bind(booking_id)
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or(BookingError::BookingNotFound(booking_id))?;

        // Отменять может админ, владелец или тот же email, что указан в брони
        let owns = identity.user_id.is_some() && identity.user_id == head.user_id;
        let same_email = identity.email.as_deref() == Some(head.email.as_str());
        if !identity.is_admin && !owns && !same_email {
            return Err(BookingError::Unauthorized);
        }

        let lock = self.movie_lock(head.movie_id);
        let _guard = lock.lock().await;

        let mut tx = self.db.pool.begin().await?;

        let seats = sqlx::query_as::<_, (i32, i32)>(
            "SELECT row, col FROM booking_seats WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_all(&mut *tx)
        .await?;

        for (row, col) in &seats {
            sqlx::query("UPDATE seats SET is_booked = 0 WHERE movie_id = $1 AND row = $2 AND col = $3")
                .bind(head.movie_id)
                .bind(row)
                .bind(col)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM booking_seats WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        // Бронь могла исчезнуть между первым чтением и взятием блокировки
        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(BookingError::BookingNotFound(booking_id));
        }

        tx.commit().await?;

        for (row, col) in seats {
            self.cache
                .set_seat(head.movie_id, SeatPos::new(row, col), false)
                .await;
        }

        info!("Cancelled booking {} for movie {}", head.id, head.movie_id);
        Ok(())
    }
}
