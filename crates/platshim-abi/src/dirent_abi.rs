//! ABI layer for `<dirent.h>`: directory-stream reads in fixed-width form.
//!
//! The `DIR*` stays owned by the caller. The name handed back is a view into
//! the stream's own buffer, valid only until the next read on that stream.

use std::ffi::c_char;

use crate::errno::set_errno;
use crate::util::bounded_name_len;

/// Bytes available for `d_name` in the platform's `struct dirent`.
#[inline]
const fn d_name_capacity() -> usize {
    std::mem::size_of::<libc::dirent>() - std::mem::offset_of!(libc::dirent, d_name)
}

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
))]
#[inline]
unsafe fn entry_inode(dent: *const libc::dirent) -> u64 {
    u64::from(unsafe { (*dent).d_fileno })
}

#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
#[inline]
unsafe fn entry_inode(dent: *const libc::dirent) -> u64 {
    u64::from(unsafe { (*dent).d_ino })
}

#[cfg(any(target_os = "solaris", target_os = "illumos", target_os = "haiku"))]
#[inline]
unsafe fn entry_type(_dent: *const libc::dirent) -> u8 {
    0 // DT_UNKNOWN: no d_type on these targets
}

#[cfg(not(any(target_os = "solaris", target_os = "illumos", target_os = "haiku")))]
#[inline]
unsafe fn entry_type(dent: *const libc::dirent) -> u8 {
    unsafe { (*dent).d_type }
}

/// Read the next entry from `dirp`.
///
/// On success writes the name view (`d_name`, `d_name_len` excluding the
/// NUL), the inode widened to 64 bits, and the raw `d_type` byte, then
/// returns `true`. Returns `false` at end of stream and on error alike.
/// `errno` is cleared before the read, so it stays `0` at end of stream and
/// holds the cause on error.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_readdir64(
    dirp: *mut libc::DIR,
    d_name: *mut *const c_char,
    d_name_len: *mut usize,
    d_ino: *mut u64,
    d_type: *mut u8,
) -> bool {
    if dirp.is_null() {
        set_errno(libc::EBADF);
        return false;
    }
    if d_name.is_null() || d_name_len.is_null() || d_ino.is_null() || d_type.is_null() {
        set_errno(libc::EFAULT);
        return false;
    }

    set_errno(0);
    let dent = unsafe { libc::readdir(dirp) };
    if dent.is_null() {
        return false;
    }

    // Raw field address: the record may be shorter than `struct dirent`.
    let name = unsafe { std::ptr::addr_of!((*dent).d_name) }.cast::<c_char>();
    let len = unsafe { bounded_name_len(name, d_name_capacity()) };
    unsafe {
        *d_name = name;
        *d_name_len = len;
        *d_ino = entry_inode(dent);
        *d_type = entry_type(dent);
    }
    true
}
