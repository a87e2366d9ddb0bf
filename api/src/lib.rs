// Library exports for testing and external use

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::{configure, create_app};
pub use routes::otp::AppState;
