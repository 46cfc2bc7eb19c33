pub mod config;
pub mod database;
pub mod errors;
pub mod services;

#[cfg(feature = "server")]
pub mod server;
