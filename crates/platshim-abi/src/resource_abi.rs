//! ABI layer for `getrusage`.

use std::ffi::c_int;

use platshim_core::resource::Rusage64;
use platshim_core::time::Timeval64;

use crate::errno::set_errno;

/// `getrusage(who)` into a [`Rusage64`].
///
/// Returns the native result. The record is written only on success; every
/// field is widened from its native type, so nothing can be lost.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn C_getrusage64(who: c_int, usage: *mut Rusage64) -> c_int {
    if usage.is_null() {
        set_errno(libc::EFAULT);
        return -1;
    }

    let mut native: libc::rusage = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::getrusage(who, &mut native) };
    if rc != 0 {
        return rc;
    }

    let wide = Rusage64::from_parts(
        Timeval64::from_parts(native.ru_utime.tv_sec, native.ru_utime.tv_usec),
        Timeval64::from_parts(native.ru_stime.tv_sec, native.ru_stime.tv_usec),
        native.ru_maxrss,
        native.ru_nsignals,
    );
    unsafe { *usage = wide };
    rc
}
