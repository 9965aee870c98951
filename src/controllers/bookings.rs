use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::models::{Booking, Identity, SeatPos};
use crate::services::BookingError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/bookings", get(list_bookings))
        .route("/bookings/{id}", get(view_booking))
        .route("/bookings/{id}", delete(cancel_booking))
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize, Validate)]
struct CreateBookingRequest {
    #[serde(alias = "customerName")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(alias = "customerEmail")]
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[serde(rename = "movieId", alias = "movieID")]
    pub movie_id: i64,
    #[validate(length(min = 1, message = "at least one seat is required"))]
    pub seats: Vec<String>,
}

#[derive(Debug, Serialize)]
struct BookingResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "bookingId", skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<i64>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, BookingError> {
    if let Err(e) = req.validate() {
        return Err(BookingError::Validation(e.to_string()));
    }

    // Координаты парсим на границе, дальше живет только SeatPos
    let mut seats = Vec::with_capacity(req.seats.len());
    for raw in &req.seats {
        let seat: SeatPos = raw
            .parse()
            .map_err(|e: crate::models::seat::ParseSeatError| {
                BookingError::Validation(e.to_string())
            })?;
        seats.push(seat);
    }

    let booking_id = state
        .booking
        .create_booking(req.movie_id, &req.name, &req.email, &seats, &identity)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            message: "Booking successful".to_string(),
            booking_id: Some(booking_id),
        }),
    ))
}

// GET /api/bookings - админ видит все, пользователь только свои
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: crate::middleware::AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = user.0;
    let bookings = if user.is_admin {
        Booking::list_all(&state.db).await
    } else {
        Booking::list_for_user(user.id, &user.email, &state.db).await
    };

    let bookings = bookings.map_err(|e| {
        tracing::error!("list_bookings sql error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load bookings".to_string(),
        )
    })?;

    Ok(Json(bookings))
}

// GET /api/bookings/{id}
async fn view_booking(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, BookingError> {
    let booking = Booking::find_by_id(id, &state.db)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;

    let owns = identity.user_id.is_some() && identity.user_id == booking.user_id;
    let same_email = identity.email.as_deref() == Some(booking.email.as_str());
    if !identity.is_admin && !owns && !same_email {
        return Err(BookingError::Unauthorized);
    }

    Ok(Json(booking))
}

// DELETE /api/bookings/{id}
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, BookingError> {
    state.booking.cancel_booking(id, &identity).await?;

    Ok(Json(BookingResponse {
        success: true,
        message: "Booking cancelled".to_string(),
        booking_id: Some(id),
    }))
}
