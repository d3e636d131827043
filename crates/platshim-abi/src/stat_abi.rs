//! ABI layer for `fstatat`: file status relative to a directory descriptor.

use std::ffi::{c_char, c_int};

use crate::errno::set_errno;

/// `fstatat(dirfd, path, flag)` reduced to device, inode and mode.
///
/// `flag` is passed through untouched (`AT_SYMLINK_NOFOLLOW` and friends).
/// On success writes all three outputs widened to 64 bits and returns
/// `true`. On failure returns `false`, writes nothing, and leaves `errno` as
/// `fstatat` set it.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_fstatat64(
    dirfd: c_int,
    path: *const c_char,
    flag: c_int,
    st_dev: *mut u64,
    st_ino: *mut u64,
    st_mode: *mut u64,
) -> bool {
    if path.is_null() || st_dev.is_null() || st_ino.is_null() || st_mode.is_null() {
        set_errno(libc::EFAULT);
        return false;
    }

    let mut buf: libc::stat = unsafe { std::mem::zeroed() };
    if unsafe { libc::fstatat(dirfd, path, &mut buf, flag) } == -1 {
        return false;
    }

    unsafe {
        // dev_t is signed on Darwin; keep its bit pattern.
        *st_dev = buf.st_dev as u64;
        *st_ino = u64::from(buf.st_ino);
        *st_mode = u64::from(buf.st_mode);
    }
    true
}
