//! "Not defined here" sentinels and the few platform constants `libc` lacks.
//!
//! Every other exported constant comes straight from the `libc` crate in the
//! ABI layer. What remains here is taken from the platform's system headers:
//! `_PATH_BSHELL` (a string macro) and NetBSD's `ST_LOCAL`.

use std::ffi::CStr;

/// Returned for a resource-limit identifier the target does not define.
pub const RLIMIT_UNDEFINED: i32 = -1;

/// Returned for a `confstr` key the target does not define.
pub const CONFSTR_KEY_UNDEFINED: i32 = -1;

/// Returned for a bit flag the target does not define: absence is "no flag".
pub const FLAG_ABSENT: u64 = 0;

/// Returned for a `pathconf` key the target does not define.
pub const PATHCONF_KEY_ABSENT: i32 = 0;

/// `_PATH_BSHELL` from `<paths.h>`.
#[cfg(target_os = "android")]
pub const PATH_BSHELL: &CStr = c"/system/bin/sh";
#[cfg(not(target_os = "android"))]
pub const PATH_BSHELL: &CStr = c"/bin/sh";

/// `ST_LOCAL`, the NetBSD `statvfs` flag for a locally mounted filesystem.
#[cfg(target_os = "netbsd")]
pub const ST_LOCAL: Option<u64> = Some(0x0000_1000);
#[cfg(not(target_os = "netbsd"))]
pub const ST_LOCAL: Option<u64> = None;

/// `ST_LOCAL`, or [`FLAG_ABSENT`].
#[inline]
#[must_use]
pub const fn st_local() -> u64 {
    match ST_LOCAL {
        Some(flag) => flag,
        None => FLAG_ABSENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_path_is_absolute_and_nul_terminated() {
        let bytes = PATH_BSHELL.to_bytes_with_nul();
        assert_eq!(bytes.first(), Some(&b'/'));
        assert_eq!(bytes.last(), Some(&0));
        assert!(PATH_BSHELL.to_bytes().ends_with(b"/sh"));
    }

    #[test]
    fn sentinels_follow_flag_vs_key_convention() {
        assert_eq!(RLIMIT_UNDEFINED, -1);
        assert_eq!(CONFSTR_KEY_UNDEFINED, -1);
        assert_eq!(FLAG_ABSENT, 0);
        assert_eq!(PATHCONF_KEY_ABSENT, 0);
    }

    #[test]
    fn st_local_only_on_netbsd() {
        assert_eq!(st_local(), ST_LOCAL.unwrap_or(FLAG_ABSENT));
        #[cfg(target_os = "netbsd")]
        assert_eq!(st_local(), 0x1000);
        #[cfg(not(target_os = "netbsd"))]
        assert_eq!(st_local(), FLAG_ABSENT);
    }
}
