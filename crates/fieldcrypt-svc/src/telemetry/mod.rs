//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No PHI or key material** may appear in any log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by
//!   `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
