//! ABI layer for syscalls that exchange time structures.
//!
//! The host speaks [`Timeval64`] / [`Timespec64`] and 64-bit epoch seconds.
//! Outbound values (the OS reports a time) are widened, which never loses
//! information. Inbound values (the host hands a time to the OS) are
//! narrowed through [`crate::fatal`], which aborts on truncation.

use std::ffi::c_int;

use platshim_core::narrow::narrow;
use platshim_core::time::{Timespec64, Timeval64};

use crate::errno::set_errno;
use crate::fatal::{native_timespec, native_timeval};

// ---------------------------------------------------------------------------
// select
// ---------------------------------------------------------------------------

/// `select` with a 64-bit timeout.
///
/// A null `timeout64` blocks indefinitely. Otherwise the timeout is narrowed
/// (aborting if it does not fit), and after the call the native timeout is
/// written back, so platforms that report remaining time do so through the
/// wide struct too. Returns the native result unchanged.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_select64(
    nfds: c_int,
    readfds: *mut libc::fd_set,
    writefds: *mut libc::fd_set,
    errorfds: *mut libc::fd_set,
    timeout64: *mut Timeval64,
) -> c_int {
    if timeout64.is_null() {
        return unsafe {
            libc::select(nfds, readfds, writefds, errorfds, std::ptr::null_mut())
        };
    }

    let mut timeout = native_timeval("C_select64", unsafe { &*timeout64 });
    let rc = unsafe { libc::select(nfds, readfds, writefds, errorfds, &mut timeout) };
    unsafe { *timeout64 = Timeval64::from_parts(timeout.tv_sec, timeout.tv_usec) };
    rc
}

// ---------------------------------------------------------------------------
// pselect
// ---------------------------------------------------------------------------

/// `pselect` with a 64-bit timeout.
///
/// `sigmask` is installed atomically for the duration of the wait (null
/// keeps the current mask). The timeout is narrowed, aborting if it does not
/// fit; `pselect` never updates it, so nothing is written back.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_pselect64(
    nfds: c_int,
    readfds: *mut libc::fd_set,
    writefds: *mut libc::fd_set,
    errorfds: *mut libc::fd_set,
    timeout64: *const Timespec64,
    sigmask: *const libc::sigset_t,
) -> c_int {
    let timeout = if timeout64.is_null() {
        None
    } else {
        Some(native_timespec("C_pselect64", unsafe { &*timeout64 }))
    };
    let timeout_ptr = timeout
        .as_ref()
        .map_or(std::ptr::null(), |ts| ts as *const libc::timespec);
    unsafe { libc::pselect(nfds, readfds, writefds, errorfds, timeout_ptr, sigmask) }
}

// ---------------------------------------------------------------------------
// clock_gettime
// ---------------------------------------------------------------------------

/// `clock_gettime` into a [`Timespec64`].
///
/// Returns `false` (with `errno` from the OS) for an unsupported clock.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_clock_gettime64(
    clock_id: libc::clockid_t,
    tp: *mut Timespec64,
) -> bool {
    if tp.is_null() {
        set_errno(libc::EFAULT);
        return false;
    }

    let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
    if unsafe { libc::clock_gettime(clock_id, &mut ts) } == -1 {
        return false;
    }
    unsafe { *tp = Timespec64::from_parts(ts.tv_sec, ts.tv_nsec) };
    true
}

// ---------------------------------------------------------------------------
// futimens
// ---------------------------------------------------------------------------

/// `futimens` from two [`Timespec64`] values (access, then modification).
///
/// `UTIME_NOW` / `UTIME_OMIT` in `tv_nsec` pass through unchanged. Both
/// values are narrowed before the call, aborting if either does not fit.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_futimens64(fd: c_int, atime: Timespec64, mtime: Timespec64) -> bool {
    let times = [
        native_timespec("C_futimens64", &atime),
        native_timespec("C_futimens64", &mtime),
    ];
    unsafe { libc::futimens(fd, times.as_ptr()) == 0 }
}

// ---------------------------------------------------------------------------
// localtime_r
// ---------------------------------------------------------------------------

/// `localtime_r` from 64-bit epoch seconds.
///
/// Epoch timestamps are data rather than caller invariants, so a value the
/// native `time_t` cannot hold fails with `EOVERFLOW` instead of aborting.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_localtime64_r(timep: i64, result: *mut libc::tm) -> bool {
    if result.is_null() {
        set_errno(libc::EFAULT);
        return false;
    }
    let Ok(native) = narrow::<libc::time_t>(timep) else {
        set_errno(libc::EOVERFLOW);
        return false;
    };
    !unsafe { libc::localtime_r(&native, result) }.is_null()
}
