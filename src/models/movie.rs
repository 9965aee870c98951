use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::seat::SeatGrid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub time: String,
    pub duration: String,
    pub image: Option<String>,
    pub price: f64,
    // Не колонка БД: собирается из таблицы seats при загрузке
    #[sqlx(skip)]
    pub seats: SeatGrid,
}

impl Movie {
    pub fn available_seats(&self) -> usize {
        self.seats.available()
    }
}

/// Scalar fields accepted by the admin create/update interface.
#[derive(Debug, Clone, Default)]
pub struct MovieInput {
    pub title: String,
    pub time: String,
    pub duration: String,
    pub price: f64,
    pub image: Option<String>,
}
