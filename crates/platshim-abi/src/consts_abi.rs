//! ABI layer for macro-only platform constants.
//!
//! Resource-limit identifiers (`<sys/resource.h>`), the `confstr` shell-path
//! key (`<unistd.h>`), the Darwin case-sensitivity `pathconf` key, the
//! `statfs`/`statvfs` "local filesystem" flags and `_PATH_BSHELL`
//! (`<paths.h>`), each exported as a zero-argument function.
//!
//! Sentinels: `-1` for an identifier or key the target does not define, `0`
//! for a bit flag or `pathconf` key the target does not define.

use std::ffi::{c_char, c_int};

use platshim_core::consts as consts_core;

// ---------------------------------------------------------------------------
// Resource limits defined on every POSIX target
// ---------------------------------------------------------------------------

export_const! {
    /// `RLIMIT_CORE`: maximum core file size.
    fn C_RLIMIT_CORE() -> c_int = libc::RLIMIT_CORE;
    /// `RLIMIT_DATA`: maximum data segment size.
    fn C_RLIMIT_DATA() -> c_int = libc::RLIMIT_DATA;
    /// `RLIMIT_FSIZE`: maximum file size.
    fn C_RLIMIT_FSIZE() -> c_int = libc::RLIMIT_FSIZE;
    /// `RLIMIT_NOFILE`: maximum number of open file descriptors.
    fn C_RLIMIT_NOFILE() -> c_int = libc::RLIMIT_NOFILE;
    /// `RLIMIT_STACK`: maximum stack size.
    fn C_RLIMIT_STACK() -> c_int = libc::RLIMIT_STACK;
    /// `RLIMIT_CPU`: maximum CPU time in seconds.
    fn C_RLIMIT_CPU() -> c_int = libc::RLIMIT_CPU;
}

// ---------------------------------------------------------------------------
// Platform-optional resource limits
// ---------------------------------------------------------------------------

optional_rlimit! {
    /// `RLIMIT_SBSIZE`: maximum socket buffer size (BSD).
    fn C_RLIMIT_SBSIZE() = libc::RLIMIT_SBSIZE if ["freebsd", "dragonfly", "netbsd"];
    /// `RLIMIT_NICE`: ceiling on nice value (Linux).
    fn C_RLIMIT_NICE() = libc::RLIMIT_NICE if ["linux", "android"];
    /// `RLIMIT_SIGPENDING`: maximum queued signals (Linux).
    fn C_RLIMIT_SIGPENDING() = libc::RLIMIT_SIGPENDING if ["linux", "android"];
    /// `RLIMIT_MEMLOCK`: maximum locked-in-memory address space.
    fn C_RLIMIT_MEMLOCK() = libc::RLIMIT_MEMLOCK if [
        "linux", "android", "macos", "ios", "freebsd", "dragonfly", "netbsd", "openbsd",
    ];
    /// `RLIMIT_RSS`: maximum resident set size.
    fn C_RLIMIT_RSS() = libc::RLIMIT_RSS if [
        "linux", "android", "macos", "ios", "freebsd", "dragonfly", "netbsd", "openbsd",
    ];
    /// `RLIMIT_MSGQUEUE`: maximum bytes in POSIX message queues (Linux).
    fn C_RLIMIT_MSGQUEUE() = libc::RLIMIT_MSGQUEUE if ["linux", "android"];
    /// `RLIMIT_RTPRIO`: ceiling on real-time priority (Linux).
    fn C_RLIMIT_RTPRIO() = libc::RLIMIT_RTPRIO if ["linux", "android"];
    /// `RLIMIT_NPROC`: maximum number of processes for the real user ID.
    fn C_RLIMIT_NPROC() = libc::RLIMIT_NPROC if [
        "linux", "android", "macos", "ios", "freebsd", "dragonfly", "netbsd", "openbsd",
    ];
    /// `RLIMIT_AS`: maximum address space size.
    fn C_RLIMIT_AS() = libc::RLIMIT_AS if [
        "linux", "android", "macos", "ios", "freebsd", "dragonfly", "netbsd",
    ];
    /// `RLIMIT_SWAP`: maximum swap reservation (FreeBSD).
    fn C_RLIMIT_SWAP() = libc::RLIMIT_SWAP if ["freebsd"];
    /// `RLIMIT_RTTIME`: CPU time limit for real-time tasks, in microseconds (Linux).
    fn C_RLIMIT_RTTIME() = libc::RLIMIT_RTTIME if ["linux", "android"];
    /// `RLIMIT_KQUEUES`: maximum number of kqueues (FreeBSD).
    fn C_RLIMIT_KQUEUES() = libc::RLIMIT_KQUEUES if ["freebsd"];
    /// `RLIMIT_NPTS`: maximum number of pseudo-terminals (FreeBSD).
    fn C_RLIMIT_NPTS() = libc::RLIMIT_NPTS if ["freebsd"];
    /// `RLIMIT_NTHR`: maximum number of threads (NetBSD).
    fn C_RLIMIT_NTHR() = libc::RLIMIT_NTHR if ["netbsd"];
}

// ---------------------------------------------------------------------------
// confstr / pathconf keys, filesystem flags, shell path
// ---------------------------------------------------------------------------

optional_const! {
    /// `_CS_PATH`, or `-1` when the target has no such `confstr` key.
    fn C_CS_PATH() -> c_int = libc::_CS_PATH if [
        "linux", "macos", "ios", "freebsd", "dragonfly", "netbsd", "openbsd", "illumos",
    ] else consts_core::CONFSTR_KEY_UNDEFINED;
    /// `_PC_CASE_SENSITIVE`, or `0` when the target has no such `pathconf` key.
    fn C_PC_CASE_SENSITIVE() -> c_int = libc::_PC_CASE_SENSITIVE
        if ["macos", "ios"] else consts_core::PATHCONF_KEY_ABSENT;
    /// `MNT_LOCAL`, or `0` when the target has no such `statfs` flag.
    fn C_MNT_LOCAL() -> u64 = libc::MNT_LOCAL if [
        "macos", "ios", "freebsd", "dragonfly", "netbsd", "openbsd",
    ] else consts_core::FLAG_ABSENT;
}

export_const! {
    /// `ST_LOCAL`, or `0` when the target has no such `statvfs` flag.
    fn C_ST_LOCAL() -> u64 = consts_core::st_local();
    /// `_PATH_BSHELL`: NUL-terminated, static storage, never freed.
    fn C_PATH_BSHELL() -> *const c_char = consts_core::PATH_BSHELL.as_ptr();
}

// ---------------------------------------------------------------------------
// confstr
// ---------------------------------------------------------------------------

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "illumos"
))]
mod native {
    use std::ffi::{c_char, c_int};

    unsafe extern "C" {
        pub fn confstr(name: c_int, buf: *mut c_char, len: usize) -> usize;
    }
}

/// POSIX `confstr`, linkable on every target.
///
/// Forwards to the C library where `_CS_PATH` exists. Elsewhere returns `0`,
/// the `confstr` failure value, so the host can always bind this symbol and
/// pair it with [`C_CS_PATH`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_confstr(name: c_int, buf: *mut c_char, len: usize) -> usize {
    #[cfg(any(
        target_os = "linux",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "illumos"
    ))]
    {
        if name == consts_core::CONFSTR_KEY_UNDEFINED {
            return 0;
        }
        unsafe { native::confstr(name, buf, len) }
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "illumos"
    )))]
    {
        let _ = (name, buf, len);
        0
    }
}
