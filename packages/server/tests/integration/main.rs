mod helpers;

mod actor;
mod movie;
mod user;
