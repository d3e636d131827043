//! Generators for the constant exporters.
//!
//! A preprocessor constant has no linkable symbol. Each one the host needs is
//! wrapped in a `#[unsafe(no_mangle)] pub extern "C" fn` returning its value,
//! so the host can query it at runtime without platform headers.

/// Export a constant every supported target defines.
///
/// # Usage
///
/// ```ignore
/// export_const! {
///     /// Doc comment for the accessor.
///     fn C_RLIMIT_CPU() -> c_int = libc::RLIMIT_CPU;
/// }
/// ```
macro_rules! export_const {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident() -> $ret:ty = $value:expr;
        )+
    ) => {
        $(
            $(#[$meta])*
            #[unsafe(no_mangle)]
            pub extern "C" fn $name() -> $ret {
                $value as $ret
            }
        )+
    };
}

/// Export a `libc` constant that only some targets define, with a sentinel
/// for the rest.
///
/// # Usage
///
/// ```ignore
/// optional_const! {
///     fn C_MNT_LOCAL() -> u64 = libc::MNT_LOCAL if ["macos", "freebsd"] else FLAG_ABSENT;
/// }
/// ```
macro_rules! optional_const {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident() -> $ret:ty = libc::$konst:ident
                if [$($os:literal),+ $(,)?] else $fallback:expr;
        )+
    ) => {
        $(
            $(#[$meta])*
            #[unsafe(no_mangle)]
            pub extern "C" fn $name() -> $ret {
                #[cfg(any($(target_os = $os),+))]
                {
                    libc::$konst as $ret
                }
                #[cfg(not(any($(target_os = $os),+)))]
                {
                    $fallback
                }
            }
        )+
    };
}

/// [`optional_const!`] for resource-limit identifiers: `c_int`, falling back
/// to [`RLIMIT_UNDEFINED`](platshim_core::consts::RLIMIT_UNDEFINED).
///
/// # Usage
///
/// ```ignore
/// optional_rlimit! {
///     fn C_RLIMIT_NICE() = libc::RLIMIT_NICE if ["linux", "android"];
/// }
/// ```
macro_rules! optional_rlimit {
    (
        $(
            $(#[$meta:meta])*
            fn $name:ident() = libc::$konst:ident if [$($os:literal),+ $(,)?];
        )+
    ) => {
        optional_const! {
            $(
                $(#[$meta])*
                fn $name() -> ::std::ffi::c_int = libc::$konst
                    if [$($os),+] else platshim_core::consts::RLIMIT_UNDEFINED;
            )+
        }
    };
}
