pub mod booking;
pub mod movie;
pub mod seat;
pub mod session;
pub mod user;

pub use booking::Booking;
pub use movie::{Movie, MovieInput};
pub use seat::{SeatGrid, SeatPos, GRID_COLS, GRID_ROWS};
pub use session::Session;
pub use user::{Identity, User};
