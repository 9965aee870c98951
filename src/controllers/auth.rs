use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::{Booking, Session, User};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/profile", get(profile))
}

/* ---------- AUTH ---------- */

#[derive(Debug, Deserialize, Validate)]
struct RegisterRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    pub token: String,
    #[serde(rename = "userID")]
    pub user_id: i64,
}

// POST /api/auth/register - создает пользователя и сразу логинит
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let existing = User::find_by_email(&req.email, &state.db)
        .await
        .map_err(internal)?;
    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            "User with this email already exists".to_string(),
        ));
    }

    let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| {
            tracing::error!("bcrypt error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
        })?;

    let user_id = User::create(&req.name, &req.email, &hash, &state.db)
        .await
        .map_err(internal)?;

    let token = Session::create(user_id, state.config.session.ttl_hours, &state.db)
        .await
        .map_err(internal)?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token, user_id })))
}

// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let user = User::find_by_email(&req.email, &state.db)
        .await
        .map_err(internal)?;

    // Одинаковое сообщение для неизвестного email и неверного пароля
    let user = match user {
        Some(user) if user.verify_password(&req.password) => user,
        _ => {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ))
        }
    };

    let token = Session::create(user.id, state.config.session.ttl_hours, &state.db)
        .await
        .map_err(internal)?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            token,
            user_id: user.id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct LogoutRequest {
    pub token: String,
}

// POST /api/auth/logout - инвалидирует предъявленный токен
async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    Session::delete(&req.token, &state.db)
        .await
        .map_err(internal)?;
    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}

// GET /api/auth/profile - пользователь и его последние брони
async fn profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let bookings = Booking::list_for_user(user.id, &user.email, &state.db)
        .await
        .map_err(internal)?;

    Ok(Json(json!({
        "user": user,
        "bookings": bookings,
    })))
}

fn internal(e: sqlx::Error) -> (StatusCode, String) {
    tracing::error!("auth sql error: {:?}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}
