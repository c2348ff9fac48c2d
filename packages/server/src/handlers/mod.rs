pub mod actor;
pub mod media;
pub mod movie;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
