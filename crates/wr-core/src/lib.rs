//! Shared error taxonomy and value types for the war-room memory crates.

pub mod error;
pub mod types;

pub use error::MemoryError;
pub use types::{DEFAULT_CATEGORY, OutputFormat, normalize_category, normalize_label};
