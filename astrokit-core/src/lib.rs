//! Astrokit Core - Fundamental types
//!
//! This crate provides the core types used throughout astrokit:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `AstroError`: Structured errors with codes and suggestions

mod value;
mod error;

pub use value::Value;
pub use error::{AstroError, ErrorContext, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, AstroError, Severity};
    pub use crate::error::codes;
}
