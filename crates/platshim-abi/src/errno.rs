//! Thread-local `errno` access.
//!
//! The layer never translates `errno`; it only clears it where the OS leaves
//! end-of-stream and failure indistinguishable, and sets it when it rejects
//! a call before reaching the OS.

use std::ffi::c_int;

#[inline]
fn errno_location() -> Option<*mut c_int> {
    #[cfg(target_os = "linux")]
    {
        Some(unsafe { libc::__errno_location() })
    }
    #[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
    {
        Some(unsafe { libc::__errno() })
    }
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    {
        Some(unsafe { libc::__error() })
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd"
    )))]
    {
        None
    }
}

/// Set the calling thread's `errno`. No-op where the location is unknown.
#[inline]
pub(crate) fn set_errno(value: c_int) {
    if let Some(p) = errno_location() {
        unsafe { *p = value };
    }
}
