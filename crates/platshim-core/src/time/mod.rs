//! Wide time records and their native conversions.
//!
//! [`Timeval64`] and [`Timespec64`] mirror `struct timeval` and
//! `struct timespec` with every field fixed at 64 bits, so values past
//! 2038-01-19 survive on targets whose native `time_t` is 32 bits wide.
//! Conversions from native parts widen and cannot fail; conversions back to
//! native parts go through [`narrow`] and report the first field that does
//! not fit.

use thiserror::Error;

use crate::narrow::{NarrowError, narrow, widen};

/// Microseconds per second.
pub const USEC_PER_SEC: i64 = 1_000_000;

/// Nanoseconds per second.
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// A wide field that could not be narrowed into its native counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {source}")]
pub struct FieldOverflow {
    /// Native field name (`tv_sec`, `tv_usec`, `tv_nsec`).
    pub field: &'static str,
    pub source: NarrowError,
}

/// 64-bit `struct timeval`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timeval64 {
    /// Seconds.
    pub tv_sec: i64,
    /// Microseconds (0 to 999_999).
    pub tv_usec: i64,
}

impl Timeval64 {
    /// Zero-length duration.
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(tv_sec: i64, tv_usec: i64) -> Self {
        Self { tv_sec, tv_usec }
    }

    /// Build from native `tv_sec` / `tv_usec` values.
    #[inline]
    #[must_use]
    pub fn from_parts<S, U>(sec: S, usec: U) -> Self
    where
        i64: From<S> + From<U>,
    {
        Self::new(widen(sec), widen(usec))
    }

    /// Narrow into native `(tv_sec, tv_usec)` types.
    pub fn narrow_parts<S, U>(&self) -> Result<(S, U), FieldOverflow>
    where
        S: Copy + TryFrom<i64>,
        U: Copy + TryFrom<i64>,
        i64: From<S> + From<U>,
    {
        let sec = narrow::<S>(self.tv_sec).map_err(|source| FieldOverflow {
            field: "tv_sec",
            source,
        })?;
        let usec = narrow::<U>(self.tv_usec).map_err(|source| FieldOverflow {
            field: "tv_usec",
            source,
        })?;
        Ok((sec, usec))
    }

    /// `true` when `tv_usec` lies in `[0, 1_000_000)`.
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.tv_usec >= 0 && self.tv_usec < USEC_PER_SEC
    }
}

/// 64-bit `struct timespec`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timespec64 {
    /// Seconds.
    pub tv_sec: i64,
    /// Nanoseconds (0 to 999_999_999).
    pub tv_nsec: i64,
}

impl Timespec64 {
    /// Zero-length duration.
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    /// Build from native `tv_sec` / `tv_nsec` values.
    #[inline]
    #[must_use]
    pub fn from_parts<S, N>(sec: S, nsec: N) -> Self
    where
        i64: From<S> + From<N>,
    {
        Self::new(widen(sec), widen(nsec))
    }

    /// Narrow into native `(tv_sec, tv_nsec)` types.
    pub fn narrow_parts<S, N>(&self) -> Result<(S, N), FieldOverflow>
    where
        S: Copy + TryFrom<i64>,
        N: Copy + TryFrom<i64>,
        i64: From<S> + From<N>,
    {
        let sec = narrow::<S>(self.tv_sec).map_err(|source| FieldOverflow {
            field: "tv_sec",
            source,
        })?;
        let nsec = narrow::<N>(self.tv_nsec).map_err(|source| FieldOverflow {
            field: "tv_nsec",
            source,
        })?;
        Ok((sec, nsec))
    }

    /// `true` when `tv_nsec` lies in `[0, 1_000_000_000)`.
    #[must_use]
    pub const fn is_normalized(&self) -> bool {
        self.tv_nsec >= 0 && self.tv_nsec < NSEC_PER_SEC
    }
}

/// Broken-down UTC time, field-compatible with `struct tm`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokenDownTime {
    pub tm_sec: i32,
    pub tm_min: i32,
    pub tm_hour: i32,
    /// Day of month (1-31).
    pub tm_mday: i32,
    /// Month (0-11).
    pub tm_mon: i32,
    /// Years since 1900.
    pub tm_year: i64,
    /// Day of week (0-6, Sunday = 0).
    pub tm_wday: i32,
    /// Day of year (0-365).
    pub tm_yday: i32,
}

#[inline]
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const DAYS_IN_MONTH: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Convert 64-bit epoch seconds to broken-down UTC.
///
/// Pure arithmetic, no timezone database. Used for log timestamps, where the
/// host's local-time rules must not leak in.
#[must_use]
pub fn utc_broken_down(epoch_secs: i64) -> BrokenDownTime {
    let days = epoch_secs.div_euclid(86_400);
    let rem = epoch_secs.rem_euclid(86_400);

    // 1970-01-01 was a Thursday.
    let tm_wday = (days + 4).rem_euclid(7) as i32;

    // Civil-from-days over 400-year eras.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy_from_march = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy_from_march + 2) / 153;
    let mday = (doy_from_march - (153 * mp + 2) / 5 + 1) as i32;
    let mon = (if mp < 10 { mp + 2 } else { mp - 10 }) as i32;
    let year = yoe + era * 400 + i64::from(mon <= 1);

    let leap = is_leap_year(year);
    let mut yday = mday - 1;
    for (m, dim) in DAYS_IN_MONTH.iter().enumerate().take(mon as usize) {
        yday += if m == 1 && leap { 29 } else { *dim };
    }

    BrokenDownTime {
        tm_sec: (rem % 60) as i32,
        tm_min: ((rem / 60) % 60) as i32,
        tm_hour: (rem / 3_600) as i32,
        tm_mday: mday,
        tm_mon: mon,
        tm_year: year - 1900,
        tm_wday,
        tm_yday: yday,
    }
}
