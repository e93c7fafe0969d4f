pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod state;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;
