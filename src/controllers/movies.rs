use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{Movie, SeatGrid};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(get_movie))
}

#[derive(Debug, Deserialize)]
struct MoviesQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub time: String,
    pub duration: String,
    pub image: Option<String>,
    pub price: f64,
    pub seats: SeatGrid,
    #[serde(rename = "availableSeats")]
    pub available_seats: usize,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        let available_seats = movie.available_seats();
        Self {
            id: movie.id,
            title: movie.title,
            time: movie.time,
            duration: movie.duration,
            image: movie.image,
            price: movie.price,
            seats: movie.seats,
            available_seats,
        }
    }
}

// GET /api/movies?q=... - пустой запрос идет из кеша, поиск из БД
async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = params.q.as_deref().unwrap_or_default();

    let movies = state.movies.search(query).await.map_err(|e| {
        tracing::error!("list_movies sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load movies".to_string(),
        )
    })?;

    let payload: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(Json(payload))
}

// GET /api/movies/{id} - снапшот из кеша
async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let movie = state
        .cache
        .get(id)
        .await
        .ok_or((StatusCode::NOT_FOUND, "Movie not found".to_string()))?;

    Ok(Json(MovieResponse::from(movie)))
}
