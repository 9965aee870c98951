use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::database::Database;
use crate::models::seat::SeatPos;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: Option<i64>,
    pub movie_id: i64,
    pub name: String,
    pub email: String,
    pub total: f64,
    pub date: NaiveDateTime,
    // Не колонка БД: упорядоченный список мест из booking_seats
    #[sqlx(skip)]
    pub seats: Vec<SeatPos>,
}

impl Booking {
    pub async fn find_by_id(id: i64, db: &Database) -> Result<Option<Booking>, sqlx::Error> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, movie_id, name, email, total, date FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await?;

        match booking {
            Some(mut b) => {
                b.seats = Self::seats_for(b.id, db).await?;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    // Все брони (админский список), новые сверху
    pub async fn list_all(db: &Database) -> Result<Vec<Booking>, sqlx::Error> {
        let mut bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, movie_id, name, email, total, date
             FROM bookings ORDER BY date DESC, id DESC",
        )
        .fetch_all(&db.pool)
        .await?;

        for b in &mut bookings {
            b.seats = Self::seats_for(b.id, db).await?;
        }
        Ok(bookings)
    }

    // Брони пользователя: по user_id или по совпадающему email (гостевые)
    pub async fn list_for_user(
        user_id: i64,
        email: &str,
        db: &Database,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let mut bookings = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, movie_id, name, email, total, date
             FROM bookings
             WHERE user_id = $1 OR email = $2
             ORDER BY date DESC, id DESC",
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(&db.pool)
        .await?;

        for b in &mut bookings {
            b.seats = Self::seats_for(b.id, db).await?;
        }
        Ok(bookings)
    }

    pub async fn seats_for(booking_id: i64, db: &Database) -> Result<Vec<SeatPos>, sqlx::Error> {
        let rows = sqlx::query_as::<_, (i32, i32)>(
            "SELECT row, col FROM booking_seats WHERE booking_id = $1 ORDER BY row, col",
        )
        .bind(booking_id)
        .fetch_all(&db.pool)
        .await?;

        Ok(rows.into_iter().map(|(row, col)| SeatPos { row, col }).collect())
    }
}
