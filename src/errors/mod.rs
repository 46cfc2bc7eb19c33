//! Domain-specific error types for mtgcards
//!
//! # Error Categories
//!
//! - **CardError**: card creation and lookup, including field-level validation
//! - **ImportError**: bulk import runs (fatal reference misses, unreadable input)
//! - **ReferenceError**: color and edition maintenance
//!
//! Every error exposes an `error_code()` used by the HTTP layer.
//!
//! ```rust
//! use mtgcards::errors::{CardError, FieldErrors};
//!
//! let mut errors = FieldErrors::new();
//! errors.add("name", "This field is required.");
//!
//! let err = CardError::Validation(errors);
//! assert!(err.is_client_error());
//! assert_eq!(err.error_code(), "VALIDATION_FAILED");
//! ```

pub mod card;
pub mod import;
pub mod reference;

pub use card::{CardError, FieldErrors};
pub use import::ImportError;
pub use reference::ReferenceError;

/// Result type alias for card operations
pub type CardResult<T> = Result<T, CardError>;

/// Result type alias for import runs
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type alias for reference data operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;
