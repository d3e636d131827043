//! Live probe of the wide-struct wrappers.
//!
//! Drives `C_clock_gettime64`, `C_getrusage64`, `C_readdir64` and
//! `C_fstatat64` against the running system and a caller-chosen directory,
//! writing one structured log line per call.

#![allow(unsafe_code)]

use std::ffi::{CString, c_char};
use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use platshim_abi::dirent_abi::C_readdir64;
use platshim_abi::resource_abi::C_getrusage64;
use platshim_abi::stat_abi::C_fstatat64;
use platshim_abi::time_abi::C_clock_gettime64;
use platshim_abi::util::name_view;
use platshim_abi::{Rusage64, Timespec64};
use platshim_core::time::USEC_PER_SEC;

use crate::error::HarnessError;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// One directory entry as seen through `C_readdir64` + `C_fstatat64`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryProbe {
    pub name: String,
    pub d_ino: u64,
    pub d_type: u8,
    /// `None` when `fstatat` failed on the entry.
    pub st_dev: Option<u64>,
    pub st_ino: Option<u64>,
    pub st_mode: Option<u64>,
}

impl EntryProbe {
    /// The inode from the directory stream agrees with `fstatat`.
    #[must_use]
    pub fn inode_consistent(&self) -> bool {
        self.st_ino.is_none_or(|ino| ino == self.d_ino)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    /// `CLOCK_REALTIME` as `(seconds, nanoseconds)`.
    pub realtime: (i64, i64),
    pub monotonic: (i64, i64),
    pub maxrss: i64,
    pub utime_usec: i64,
    pub stime_usec: i64,
    /// Entries other than `.` and `..`, in stream order.
    pub entries: Vec<EntryProbe>,
}

/// Owns a `DIR*` for the duration of the probe.
struct DirStream(*mut libc::DIR);

impl DirStream {
    /// `None` leaves `opendir`'s errno in place for the caller.
    fn open(path: &CString) -> Option<Self> {
        let dirp = unsafe { libc::opendir(path.as_ptr()) };
        if dirp.is_null() {
            None
        } else {
            Some(Self(dirp))
        }
    }

    fn fd(&self) -> libc::c_int {
        unsafe { libc::dirfd(self.0) }
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        unsafe { libc::closedir(self.0) };
    }
}

fn last_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

fn elapsed_ns(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Build the log line for one call. Reads `errno` on failure, so call it
/// before anything else can touch it.
fn call_entry(symbol: &str, ok: bool, start: Instant) -> LogEntry {
    let entry = LogEntry::new("", if ok { LogLevel::Info } else { LogLevel::Warn }, "call")
        .with_symbol(symbol)
        .with_latency_ns(elapsed_ns(start));
    if ok {
        entry.with_outcome(Outcome::Pass)
    } else {
        entry.with_outcome(Outcome::Fail).with_errno(last_errno())
    }
}

fn clock<W: Write>(
    clock_id: libc::clockid_t,
    label: &str,
    log: &mut LogEmitter<W>,
) -> Result<(i64, i64), HarnessError> {
    let mut ts = Timespec64::ZERO;
    let start = Instant::now();
    let ok = unsafe { C_clock_gettime64(clock_id, &mut ts) };
    let entry = call_entry("C_clock_gettime64", ok, start).with_details(serde_json::json!({
        "clock": label,
        "tv_sec": ts.tv_sec,
        "tv_nsec": ts.tv_nsec,
    }));
    let errno = entry.errno;
    log.emit_entry(entry)?;
    if let Some(errno) = errno {
        return Err(HarnessError::Syscall {
            symbol: "C_clock_gettime64",
            errno,
        });
    }
    Ok((ts.tv_sec, ts.tv_nsec))
}

/// Run every probe against `dir`, logging through `log`.
///
/// Clock and rusage failures abort the probe. Per-entry `fstatat` failures
/// are logged and recorded as `None` (entries can vanish mid-scan).
pub fn run_probe<W: Write>(
    dir: &Path,
    log: &mut LogEmitter<W>,
) -> Result<ProbeReport, HarnessError> {
    let cdir = CString::new(dir.as_os_str().as_bytes())
        .map_err(|_| HarnessError::NulInPath(dir.display().to_string()))?;

    log.emit_entry(
        LogEntry::new("", LogLevel::Info, "probe_start")
            .with_details(serde_json::json!({ "dir": dir.display().to_string() })),
    )?;

    let realtime = clock(libc::CLOCK_REALTIME, "realtime", log)?;
    let monotonic = clock(libc::CLOCK_MONOTONIC, "monotonic", log)?;

    let mut usage = Rusage64::default();
    let start = Instant::now();
    let rc = unsafe { C_getrusage64(libc::RUSAGE_SELF, &mut usage) };
    let entry = call_entry("C_getrusage64", rc == 0, start).with_details(serde_json::json!({
        "maxrss": usage.ru_maxrss,
        "nsignals": usage.ru_nsignals,
    }));
    let errno = entry.errno;
    log.emit_entry(entry)?;
    if let Some(errno) = errno {
        return Err(HarnessError::Syscall {
            symbol: "C_getrusage64",
            errno,
        });
    }

    let Some(stream) = DirStream::open(&cdir) else {
        let err = HarnessError::last_os("opendir");
        if let HarnessError::Syscall { errno, .. } = err {
            log.emit_entry(
                LogEntry::new("", LogLevel::Error, "opendir_failed")
                    .with_outcome(Outcome::Fail)
                    .with_errno(errno),
            )?;
        }
        return Err(err);
    };

    let mut entries = Vec::new();
    loop {
        let mut name: *const c_char = std::ptr::null();
        let (mut len, mut ino, mut ty) = (0usize, 0u64, 0u8);
        let start = Instant::now();
        let more = unsafe { C_readdir64(stream.0, &mut name, &mut len, &mut ino, &mut ty) };
        if !more {
            let errno = last_errno();
            if errno != 0 {
                log.emit_entry(call_entry("C_readdir64", false, start))?;
                return Err(HarnessError::Syscall {
                    symbol: "C_readdir64",
                    errno,
                });
            }
            break;
        }

        // View is valid until the next read; copy it before anything else.
        let bytes = unsafe { name_view(name, len) };
        let display = String::from_utf8_lossy(bytes).into_owned();
        log.emit_entry(
            call_entry("C_readdir64", true, start).with_details(serde_json::json!({
                "name": display,
                "d_ino": ino,
                "d_type": ty,
            })),
        )?;
        if bytes == b"." || bytes == b".." {
            continue;
        }

        let (mut dev, mut st_ino, mut mode) = (0u64, 0u64, 0u64);
        let start = Instant::now();
        let ok = unsafe {
            C_fstatat64(
                stream.fd(),
                name,
                libc::AT_SYMLINK_NOFOLLOW,
                &mut dev,
                &mut st_ino,
                &mut mode,
            )
        };
        log.emit_entry(call_entry("C_fstatat64", ok, start).with_details(serde_json::json!({
            "name": display,
            "st_ino": st_ino,
            "st_mode": mode,
        })))?;

        entries.push(EntryProbe {
            name: display,
            d_ino: ino,
            d_type: ty,
            st_dev: ok.then_some(dev),
            st_ino: ok.then_some(st_ino),
            st_mode: ok.then_some(mode),
        });
    }
    drop(stream);

    log.emit_entry(
        LogEntry::new("", LogLevel::Info, "probe_end")
            .with_outcome(Outcome::Pass)
            .with_details(serde_json::json!({ "entries": entries.len() })),
    )?;
    log.flush()?;

    Ok(ProbeReport {
        realtime,
        monotonic,
        maxrss: usage.ru_maxrss,
        utime_usec: usage.ru_utime.tv_sec * USEC_PER_SEC + usage.ru_utime.tv_usec,
        stime_usec: usage.ru_stime.tv_sec * USEC_PER_SEC + usage.ru_stime.tv_usec,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_open_keeps_opendir_errno() {
        let dir = tempfile::tempdir().unwrap();
        let missing = CString::new(dir.path().join("absent").as_os_str().as_bytes()).unwrap();
        assert!(DirStream::open(&missing).is_none());
        assert_eq!(last_errno(), libc::ENOENT);
    }

    #[test]
    fn open_stream_exposes_a_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let path = CString::new(dir.path().as_os_str().as_bytes()).unwrap();
        let stream = DirStream::open(&path).unwrap();
        assert!(stream.fd() >= 0);
    }
}
