//! Common types, protocol definitions, and errors shared across `fieldcrypt` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
