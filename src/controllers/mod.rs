pub mod admin;
pub mod auth;
pub mod bookings;
pub mod movies;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(bookings::routes())
        .merge(auth::routes())
        .merge(admin::routes())
}
