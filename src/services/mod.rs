pub mod booking;
pub mod cleanup;
pub mod images;
pub mod movies;

pub use booking::{BookingEngine, BookingError};
pub use images::ImageStore;
pub use movies::MovieService;
