//! This module defines the core, strongly-typed data representations used
//! throughout the lighttable core.
//!
//! It includes the canonical `DataType` enum, which replaces free-form declared
//! type names with a closed, serializable set, and the `Value` enum that the
//! uniform (untyped) column facade speaks.

pub mod data_type;
pub mod value;

// Re-export the main type(s) for easier access.
pub use data_type::DataType;
pub use value::{FromValue, Value};
