//! Checked conversion between 64-bit wide integers and native-width fields.
//!
//! Narrowing converts, re-widens the result and compares it against the
//! input. A value is accepted only when that round trip reproduces it exactly.
//! Widening is infallible for every native field type the layer touches.

use thiserror::Error;

/// Failure to represent a wide value in a native field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NarrowError {
    /// The value is outside the range of the native type.
    #[error("value {value} does not fit in a {bits}-bit native field")]
    Truncated { value: i64, bits: u32 },
}

impl NarrowError {
    /// The wide value that failed to narrow.
    #[must_use]
    pub const fn value(&self) -> i64 {
        match *self {
            Self::Truncated { value, .. } => value,
        }
    }

    /// Width in bits of the native field that rejected the value.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        match *self {
            Self::Truncated { bits, .. } => bits,
        }
    }
}

/// Width in bits of the native integer type `N`.
#[inline]
#[must_use]
pub const fn native_bits<N>() -> u32 {
    (std::mem::size_of::<N>() * 8) as u32
}

/// Narrow `wide` into the native integer type `N`.
///
/// Returns [`NarrowError::Truncated`] when `N` cannot hold the value.
#[inline]
pub fn narrow<N>(wide: i64) -> Result<N, NarrowError>
where
    N: Copy + TryFrom<i64>,
    i64: From<N>,
{
    let truncated = || NarrowError::Truncated {
        value: wide,
        bits: native_bits::<N>(),
    };
    let native = N::try_from(wide).map_err(|_| truncated())?;
    if i64::from(native) != wide {
        return Err(truncated());
    }
    Ok(native)
}

/// Widen a native integer to 64 bits. Never loses information.
#[inline]
#[must_use]
pub fn widen<N>(native: N) -> i64
where
    i64: From<N>,
{
    i64::from(native)
}
