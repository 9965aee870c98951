use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::middleware::AdminUser;
use crate::models::{Booking, MovieInput};
use crate::services::ImageStore;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/movies", post(save_movie))
        .route("/admin/movies/{id}", delete(delete_movie))
}

/* ---------- ADMIN ---------- */

#[derive(Debug, Serialize)]
struct StatsResponse {
    #[serde(rename = "movieCount")]
    pub movie_count: i64,
    #[serde(rename = "bookingCount")]
    pub booking_count: i64,
    #[serde(rename = "userCount")]
    pub user_count: i64,
    #[serde(rename = "totalRevenue")]
    pub total_revenue: f64,
    #[serde(rename = "recentBookings")]
    pub recent_bookings: Vec<Booking>,
}

// GET /api/admin/stats - данные для дашборда
async fn stats(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movie_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
        .fetch_one(&state.db.pool)
        .await
        .map_err(internal)?;
    let booking_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
        .fetch_one(&state.db.pool)
        .await
        .map_err(internal)?;
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db.pool)
        .await
        .map_err(internal)?;
    let total_revenue: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(total), 0) FROM bookings")
        .fetch_one(&state.db.pool)
        .await
        .map_err(internal)?;

    let mut recent_bookings = Booking::list_all(&state.db).await.map_err(internal)?;
    recent_bookings.truncate(10);

    Ok(Json(StatsResponse {
        movie_count,
        booking_count,
        user_count,
        total_revenue,
        recent_bookings,
    }))
}

// POST /api/admin/movies - multipart: создание (без id) или обновление (с id)
async fn save_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut movie_id: Option<i64> = None;
    let mut input = MovieInput::default();
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| (StatusCode::BAD_REQUEST, "Malformed form data".to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "id" => {
                let text = text_field(field).await?;
                if !text.is_empty() {
                    movie_id = Some(text.parse().map_err(|_| {
                        (StatusCode::BAD_REQUEST, "Invalid movie ID".to_string())
                    })?);
                }
            }
            "title" => input.title = text_field(field).await?,
            "time" => input.time = text_field(field).await?,
            "duration" => input.duration = text_field(field).await?,
            "price" => {
                let text = text_field(field).await?;
                input.price = text
                    .parse()
                    .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid price".to_string()))?;
            }
            "image" => {
                let bytes = field.bytes().await.map_err(|_| {
                    (StatusCode::BAD_REQUEST, "Failed to read image".to_string())
                })?;
                if !bytes.is_empty() {
                    image_bytes = Some(bytes.to_vec());
                }
            }
            _ => {}
        }
    }

    if input.title.is_empty() || input.time.is_empty() || input.duration.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Title, time and duration are required".to_string(),
        ));
    }
    if input.price < 0.0 {
        return Err((StatusCode::BAD_REQUEST, "Price must not be negative".to_string()));
    }

    match movie_id {
        // Обновление: сетка мест не меняется
        Some(id) => {
            if let Some(bytes) = &image_bytes {
                let url = state.images.save(id, bytes).await.map_err(io_internal)?;
                input.image = Some(url);
            } else {
                // Сохраняем существующий постер
                input.image = state.cache.get(id).await.and_then(|m| m.image);
            }

            let updated = state.movies.update(id, &input).await.map_err(internal)?;
            if !updated {
                return Err((StatusCode::NOT_FOUND, "Movie not found".to_string()));
            }
            Ok(Json(json!({ "success": true, "movieID": id })))
        }
        // Создание: заодно создается полная сетка 8x10
        None => {
            input.image = Some(ImageStore::default_url());
            let id = state.movies.create(&input).await.map_err(internal)?;

            if let Some(bytes) = &image_bytes {
                let url = state.images.save(id, bytes).await.map_err(io_internal)?;
                state.movies.set_image(id, &url).await.map_err(internal)?;
            }
            Ok(Json(json!({ "success": true, "movieID": id })))
        }
    }
}

// DELETE /api/admin/movies/{id}
async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state.movies.delete(id).await.map_err(internal)?;
    if !deleted {
        return Err((StatusCode::NOT_FOUND, "Movie not found".to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, (StatusCode, String)> {
    field
        .text()
        .await
        .map_err(|_| (StatusCode::BAD_REQUEST, "Malformed form data".to_string()))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    tracing::error!("admin sql error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn io_internal(e: std::io::Error) -> (StatusCode, String) {
    tracing::error!("admin io error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to store image".to_string(),
    )
}
