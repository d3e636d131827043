//! ABI layer for `MB_CUR_MAX`.
//!
//! `MB_CUR_MAX` is a macro over a per-libc accessor that depends on the
//! current `LC_CTYPE`, so it is evaluated on every call.

#[cfg(any(target_os = "linux", target_os = "android"))]
unsafe extern "C" {
    fn __ctype_get_mb_cur_max() -> usize;
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe extern "C" {
    fn ___mb_cur_max() -> std::ffi::c_int;
}

#[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
unsafe extern "C" {
    fn __mb_cur_max() -> usize;
}

/// Maximum bytes per multibyte character in the current locale.
///
/// Targets without a known accessor report `1`, the value for the C locale.
#[unsafe(no_mangle)]
pub extern "C" fn C_MB_CUR_MAX() -> usize {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        unsafe { __ctype_get_mb_cur_max() }
    }
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    {
        usize::try_from(unsafe { ___mb_cur_max() }).unwrap_or(1)
    }
    #[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
    {
        unsafe { __mb_cur_max() }
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd"
    )))]
    {
        1
    }
}
