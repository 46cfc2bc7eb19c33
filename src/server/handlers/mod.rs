pub mod cards;
pub mod error;
pub mod health;
pub mod import;
pub mod reference;

pub use error::ApiError;
