//! This module provides a set of shared, low-level utility functions used
//! throughout the lighttable core.
//!
//! Its primary responsibility is providing safe, validated conversions between raw
//! byte slices and typed slices, so that import adapters holding raw storage can
//! hand it over without any `unsafe` code.

use crate::error::LightTableError;

//==================================================================================
// 1. Core Utility Functions
//==================================================================================

/// Safely reinterprets a byte slice as a slice of a plain-old-data type.
///
/// # Errors
/// Returns a `LightTableError::PodCast` if the byte slice length is not a multiple
/// of the size of `T`, or if the slice is not suitably aligned for `T`.
pub fn safe_bytes_to_typed_slice<T>(bytes: &[u8]) -> Result<&[T], LightTableError>
where
    T: bytemuck::Pod,
{
    bytemuck::try_cast_slice(bytes).map_err(LightTableError::from)
}

/// Converts a typed slice into an owned `Vec<u8>` in native byte order.
pub fn typed_slice_to_bytes<T: bytemuck::Pod>(data: &[T]) -> Vec<u8> {
    bytemuck::cast_slice(data).to_vec()
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
