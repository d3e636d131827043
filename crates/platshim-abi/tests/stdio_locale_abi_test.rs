//! `stdout_stream` and `C_MB_CUR_MAX` against the running C library.

#![cfg(any(target_os = "linux", target_os = "macos", target_os = "freebsd"))]

use platshim_abi::locale_abi::C_MB_CUR_MAX;
use platshim_abi::stdio_abi::stdout_stream;

#[test]
fn stdout_stream_is_descriptor_one() {
    let stream = stdout_stream();
    assert!(!stream.is_null());
    assert_eq!(unsafe { libc::fileno(stream) }, libc::STDOUT_FILENO);
}

#[test]
fn stdout_stream_is_stable() {
    assert_eq!(stdout_stream(), stdout_stream());
}

#[test]
fn stdout_stream_accepts_stdio_calls() {
    let stream = stdout_stream();
    assert_eq!(unsafe { libc::fflush(stream) }, 0);
}

#[test]
fn mb_cur_max_tracks_ctype_locale() {
    // The C locale is single-byte until something calls setlocale.
    assert_eq!(C_MB_CUR_MAX(), 1);

    let utf8 = [c"C.UTF-8", c"en_US.UTF-8"].into_iter().find(|name| {
        !unsafe { libc::setlocale(libc::LC_CTYPE, name.as_ptr()) }.is_null()
    });
    if utf8.is_some() {
        assert!(C_MB_CUR_MAX() > 1);
    }
    unsafe { libc::setlocale(libc::LC_CTYPE, c"C".as_ptr()) };
    assert_eq!(C_MB_CUR_MAX(), 1);
}
