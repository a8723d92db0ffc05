//! This module serves as the public API for all null-handling logic within the
//! lighttable core.
//!
//! A column never stores a logical null in its backing buffer. Null rows hold the
//! element type's default value, and their nullness lives either in a lazily
//! allocated bitmap or, for element types with an absent value, in the value
//! itself.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// The lazy, optionally-absent per-row null bitmap.
pub mod bitmap;

/// Bitmap and sentinel null-encoding strategies.
pub mod strategy;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use bitmap::NullBitmap;
pub use strategy::{BitmapNulls, NullStrategy, Sentinel, SentinelNulls};

//==================================================================================
// 3. Unit Tests (Module-level integration tests)
//==================================================================================
