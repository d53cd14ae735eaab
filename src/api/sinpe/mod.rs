pub mod client;
pub mod models;

pub use client::SinpeClient;
pub use models::{ApiError, CreateMovementRequest};
