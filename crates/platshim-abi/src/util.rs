//! Raw-memory helpers for the borrowed name views handed to the host.

use std::ffi::c_char;

/// Length of the NUL-terminated name at `ptr`, reading at most `capacity`
/// bytes. A name that fills the capacity without a NUL reports `capacity`.
///
/// # Safety
///
/// `ptr` must be readable up to the first NUL or `capacity` bytes, whichever
/// comes first.
pub unsafe fn bounded_name_len(ptr: *const c_char, capacity: usize) -> usize {
    // Byte at a time: the backing record may end right after the NUL.
    (0..capacity)
        .find(|&i| unsafe { *ptr.add(i) } == 0)
        .unwrap_or(capacity)
}

/// View a `(ptr, len)` name as bytes. Null or empty yields `&[]`.
///
/// # Safety
///
/// `ptr` must be valid for `len` reads for `'a`, and the memory must not be
/// reused while the view is alive. For `C_readdir64` names that means until
/// the next read on the same stream.
pub unsafe fn name_view<'a>(ptr: *const c_char, len: usize) -> &'a [u8] {
    if ptr.is_null() || len == 0 {
        return &[];
    }
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}
