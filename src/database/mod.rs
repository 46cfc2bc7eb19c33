pub mod connection;
pub mod entities;
pub mod migrations;
pub mod seed_data;

#[cfg(test)]
pub mod test_utils;

pub use connection::*;
pub use entities::*;
