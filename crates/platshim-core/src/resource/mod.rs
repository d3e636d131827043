//! Wide resource-usage record.
//!
//! Carries the subset of `struct rusage` the host runtime consumes, with
//! every field fixed at 64 bits. Filled from native fields by widening only.

use crate::narrow::widen;
use crate::time::Timeval64;

/// 64-bit `struct rusage` subset.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rusage64 {
    /// User CPU time.
    pub ru_utime: Timeval64,
    /// System CPU time.
    pub ru_stime: Timeval64,
    /// Maximum resident set size (platform units: KiB on Linux, bytes on Darwin).
    pub ru_maxrss: i64,
    /// Signals received.
    pub ru_nsignals: i64,
}

impl Rusage64 {
    /// Build from already-widened times and native counters.
    #[must_use]
    pub fn from_parts<C>(ru_utime: Timeval64, ru_stime: Timeval64, maxrss: C, nsignals: C) -> Self
    where
        i64: From<C>,
    {
        Self {
            ru_utime,
            ru_stime,
            ru_maxrss: widen(maxrss),
            ru_nsignals: widen(nsignals),
        }
    }
}
