//! Fallible-allocation helpers.
//!
//! Body lengths, container counts and stack depth are all attacker
//! controlled, so every growth path reports [`Error::AllocationFailure`]
//! instead of aborting.
use crate::error::{Error, Result};

/// Reserves room for `additional` more bytes in `out`.
pub(crate) fn try_reserve(out: &mut Vec<u8>, additional: usize) -> Result<()> {
    out.try_reserve(additional).map_err(|_| Error::AllocationFailure)
}

/// Pushes onto a stack, growing it fallibly.
pub(crate) fn try_push<T>(stack: &mut Vec<T>, item: T) -> Result<()> {
    if stack.len() == stack.capacity() {
        stack.try_reserve(1).map_err(|_| Error::AllocationFailure)?;
    }
    stack.push(item);
    Ok(())
}

/// Copies a byte slice into an owned vector.
pub(crate) fn copy_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(data.len())
        .map_err(|_| Error::AllocationFailure)?;
    out.extend_from_slice(data);
    Ok(out)
}

/// Copies a string slice into an owned string.
pub(crate) fn copy_text(text: &str) -> Result<String> {
    let mut out = String::new();
    out.try_reserve_exact(text.len())
        .map_err(|_| Error::AllocationFailure)?;
    out.push_str(text);
    Ok(out)
}

/// Allocates an empty vector that can hold `cap` items.
pub(crate) fn vec_with_capacity<T>(cap: usize) -> Result<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(cap).map_err(|_| Error::AllocationFailure)?;
    Ok(out)
}
