pub mod actor;
pub mod movie;
pub mod shared;
pub mod user;
