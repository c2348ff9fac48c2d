pub mod hash;
pub mod jwt;
pub mod media;
pub mod upload;
