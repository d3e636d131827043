//! Fatal path for native-width truncation.
//!
//! Wrappers that must narrow a caller's wide time value before calling the OS
//! route through here. A value that does not survive the narrow/re-widen
//! round trip means the caller broke its contract; the process is aborted
//! after one structured record rather than handing a wrong time to the OS.

use platshim_core::time::{FieldOverflow, Timespec64, Timeval64};

use crate::log::{self, FatalRecord};

/// Log the overflow and abort the process.
#[cold]
pub fn abort_on_overflow(symbol: &'static str, overflow: &FieldOverflow) -> ! {
    log::emit(&FatalRecord::narrowing_overflow(symbol, overflow));
    std::process::abort()
}

/// Narrow a [`Timeval64`] into native `(tv_sec, tv_usec)` or abort.
#[inline]
pub fn narrow_timeval<S, U>(symbol: &'static str, wide: &Timeval64) -> (S, U)
where
    S: Copy + TryFrom<i64>,
    U: Copy + TryFrom<i64>,
    i64: From<S> + From<U>,
{
    wide.narrow_parts::<S, U>()
        .unwrap_or_else(|overflow| abort_on_overflow(symbol, &overflow))
}

/// Narrow a [`Timespec64`] into native `(tv_sec, tv_nsec)` or abort.
#[inline]
pub fn narrow_timespec<S, N>(symbol: &'static str, wide: &Timespec64) -> (S, N)
where
    S: Copy + TryFrom<i64>,
    N: Copy + TryFrom<i64>,
    i64: From<S> + From<N>,
{
    wide.narrow_parts::<S, N>()
        .unwrap_or_else(|overflow| abort_on_overflow(symbol, &overflow))
}

/// Narrow into the platform's `struct timeval`.
pub(crate) fn native_timeval(symbol: &'static str, wide: &Timeval64) -> libc::timeval {
    let (sec, usec) = narrow_timeval::<libc::time_t, libc::suseconds_t>(symbol, wide);
    // Zeroed first: some targets carry private padding in timeval.
    let mut tv: libc::timeval = unsafe { std::mem::zeroed() };
    tv.tv_sec = sec;
    tv.tv_usec = usec;
    tv
}

/// Narrow into the platform's `struct timespec`.
pub(crate) fn native_timespec(symbol: &'static str, wide: &Timespec64) -> libc::timespec {
    let (sec, nsec) = narrow_timespec::<libc::time_t, libc::c_long>(symbol, wide);
    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    ts.tv_sec = sec;
    ts.tv_nsec = nsec;
    ts
}
