pub mod api;
pub mod client;
pub mod error;
pub mod views;

pub use client::ApiClient;
pub use error::ApiError;
