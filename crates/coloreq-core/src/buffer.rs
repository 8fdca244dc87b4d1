//! Fallible working-buffer allocation.
//!
//! The equalizer allocates several full-resolution float planes per
//! invocation. On very large images these requests can fail; instead of
//! aborting the process, allocation goes through [`Vec::try_reserve_exact`]
//! and surfaces [`Error::AllocationFailed`].

use crate::{Error, Result};

/// Allocates a zero-initialised `f32` buffer of `len` values.
///
/// # Example
///
/// ```rust
/// use coloreq_core::alloc_buffer;
///
/// let buf = alloc_buffer(64).unwrap();
/// assert_eq!(buf.len(), 64);
/// assert!(buf.iter().all(|&v| v == 0.0));
/// ```
pub fn alloc_buffer(len: usize) -> Result<Vec<f32>> {
    alloc_filled(len, 0.0)
}

/// Allocates an `f32` buffer of `len` values set to `value`.
pub fn alloc_filled(len: usize, value: f32) -> Result<Vec<f32>> {
    let requested = len.saturating_mul(std::mem::size_of::<f32>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::allocation_failed(requested, e.to_string()))?;
    buf.resize(len, value);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_filled() {
        let buf = alloc_filled(10, 1.5).unwrap();
        assert_eq!(buf.len(), 10);
        assert!(buf.iter().all(|&v| v == 1.5));
    }

    #[test]
    fn test_alloc_empty() {
        assert!(alloc_buffer(0).unwrap().is_empty());
    }

    #[test]
    fn test_alloc_impossible() {
        let err = alloc_buffer(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, Error::AllocationFailed { .. }));
    }
}
