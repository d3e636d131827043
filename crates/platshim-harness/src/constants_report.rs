//! Machine-readable table of every constant the ABI layer exports.
//!
//! Values are read back through the exported functions, so the report shows
//! exactly what a host linking the `cdylib` on this target would see.

#![allow(unsafe_code)]

use std::collections::BTreeMap;
use std::ffi::{CStr, c_int};

use serde::{Deserialize, Serialize};

use platshim_abi::consts_abi as abi;
use platshim_abi::locale_abi::C_MB_CUR_MAX;
use platshim_core::consts::{CONFSTR_KEY_UNDEFINED, RLIMIT_UNDEFINED};

/// Build-target facts that explain why a constant has the value it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetInfo {
    pub os: String,
    pub arch: String,
    pub pointer_width: u32,
    /// Width of the native `time_t`; 32 means the narrowing path can abort.
    pub time_t_bits: u32,
}

impl TargetInfo {
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            pointer_width: usize::BITS,
            time_t_bits: platshim_core::narrow::native_bits::<libc::time_t>(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantsReport {
    pub schema_version: u32,
    pub target: TargetInfo,
    /// Resource ids keyed by name. `-1` marks a limit this target lacks.
    pub rlimits: BTreeMap<String, i32>,
    pub cs_path: i32,
    /// `confstr(CS_PATH)`, when the key exists.
    pub cs_path_value: Option<String>,
    pub pc_case_sensitive: i32,
    pub mnt_local: u64,
    pub st_local: u64,
    pub path_bshell: String,
    pub mb_cur_max: usize,
}

const RLIMITS: &[(&str, extern "C" fn() -> c_int)] = &[
    ("RLIMIT_AS", abi::C_RLIMIT_AS),
    ("RLIMIT_CORE", abi::C_RLIMIT_CORE),
    ("RLIMIT_CPU", abi::C_RLIMIT_CPU),
    ("RLIMIT_DATA", abi::C_RLIMIT_DATA),
    ("RLIMIT_FSIZE", abi::C_RLIMIT_FSIZE),
    ("RLIMIT_KQUEUES", abi::C_RLIMIT_KQUEUES),
    ("RLIMIT_MEMLOCK", abi::C_RLIMIT_MEMLOCK),
    ("RLIMIT_MSGQUEUE", abi::C_RLIMIT_MSGQUEUE),
    ("RLIMIT_NICE", abi::C_RLIMIT_NICE),
    ("RLIMIT_NOFILE", abi::C_RLIMIT_NOFILE),
    ("RLIMIT_NPROC", abi::C_RLIMIT_NPROC),
    ("RLIMIT_NPTS", abi::C_RLIMIT_NPTS),
    ("RLIMIT_NTHR", abi::C_RLIMIT_NTHR),
    ("RLIMIT_RSS", abi::C_RLIMIT_RSS),
    ("RLIMIT_RTPRIO", abi::C_RLIMIT_RTPRIO),
    ("RLIMIT_RTTIME", abi::C_RLIMIT_RTTIME),
    ("RLIMIT_SBSIZE", abi::C_RLIMIT_SBSIZE),
    ("RLIMIT_SIGPENDING", abi::C_RLIMIT_SIGPENDING),
    ("RLIMIT_STACK", abi::C_RLIMIT_STACK),
    ("RLIMIT_SWAP", abi::C_RLIMIT_SWAP),
];

impl ConstantsReport {
    /// Read every exported constant.
    #[must_use]
    pub fn collect() -> Self {
        let rlimits = RLIMITS
            .iter()
            .map(|&(name, f)| (name.to_string(), f()))
            .collect();
        let cs_path = abi::C_CS_PATH();
        // SAFETY: C_PATH_BSHELL points at a static NUL-terminated string.
        let path_bshell = unsafe { CStr::from_ptr(abi::C_PATH_BSHELL()) }
            .to_string_lossy()
            .into_owned();

        Self {
            schema_version: 1,
            target: TargetInfo::current(),
            rlimits,
            cs_path,
            cs_path_value: confstr_string(cs_path),
            pc_case_sensitive: abi::C_PC_CASE_SENSITIVE(),
            mnt_local: abi::C_MNT_LOCAL(),
            st_local: abi::C_ST_LOCAL(),
            path_bshell,
            mb_cur_max: C_MB_CUR_MAX(),
        }
    }

    /// Names of the resource limits this target does not define.
    pub fn undefined_rlimits(&self) -> impl Iterator<Item = &str> {
        self.rlimits
            .iter()
            .filter(|&(_, &v)| v == RLIMIT_UNDEFINED)
            .map(|(k, _)| k.as_str())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Two-call `confstr`: size the buffer, then fill it.
fn confstr_string(key: c_int) -> Option<String> {
    if key == CONFSTR_KEY_UNDEFINED {
        return None;
    }
    // SAFETY: a null buffer with zero length only queries the size.
    let needed = unsafe { abi::C_confstr(key, std::ptr::null_mut(), 0) };
    if needed == 0 {
        return None;
    }
    let mut buf = vec![0u8; needed];
    // SAFETY: buf is writable for `needed` bytes.
    let written = unsafe { abi::C_confstr(key, buf.as_mut_ptr().cast(), buf.len()) };
    if written == 0 {
        return None;
    }
    CStr::from_bytes_until_nul(&buf)
        .ok()
        .map(|s| s.to_string_lossy().into_owned())
}
