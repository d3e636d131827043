//! ABI layer for the C library's `stdout` stream.
//!
//! `stdout` is a macro or an extern object depending on the C library. The
//! host gets the same `FILE*` the C library's own buffered output uses.

#[cfg(any(target_os = "linux", target_os = "android"))]
unsafe extern "C" {
    static stdout: *mut libc::FILE;
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
unsafe extern "C" {
    #[link_name = "__stdoutp"]
    static stdout: *mut libc::FILE;
}

/// The process's `stdout` as an opaque handle, or null on targets where the
/// stream is not reachable as a symbol.
#[unsafe(no_mangle)]
pub extern "C" fn stdout_stream() -> *mut libc::FILE {
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    {
        unsafe { stdout }
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    )))]
    {
        std::ptr::null_mut()
    }
}
