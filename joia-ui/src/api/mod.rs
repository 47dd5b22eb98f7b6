//! HTTP API for joia-ui

pub mod health;
pub mod karaoke;
pub mod songs;

pub use health::health_routes;
pub use karaoke::karaoke_routes;
pub use songs::song_routes;
