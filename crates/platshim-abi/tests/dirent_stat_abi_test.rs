#![cfg(target_os = "linux")]

use std::ffi::{CString, c_char};
use std::fs::File;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use platshim_abi::dirent_abi::C_readdir64;
use platshim_abi::stat_abi::C_fstatat64;

struct Dir(*mut libc::DIR);

impl Dir {
    fn open(path: &Path) -> Self {
        let c = CString::new(path.as_os_str().as_bytes()).unwrap();
        let dirp = unsafe { libc::opendir(c.as_ptr()) };
        assert!(!dirp.is_null(), "opendir({}) failed", path.display());
        Self(dirp)
    }
}

impl Drop for Dir {
    fn drop(&mut self) {
        unsafe { libc::closedir(self.0) };
    }
}

#[derive(Debug)]
struct Entry {
    name: Vec<u8>,
    ino: u64,
    d_type: u8,
}

fn read_entry(dir: &Dir) -> Option<Entry> {
    let mut name: *const c_char = std::ptr::null();
    let mut len = usize::MAX;
    let mut ino = 0u64;
    let mut d_type = 0xffu8;
    let ok = unsafe { C_readdir64(dir.0, &mut name, &mut len, &mut ino, &mut d_type) };
    if !ok {
        return None;
    }
    let bytes = unsafe { std::slice::from_raw_parts(name.cast::<u8>(), len) }.to_vec();
    Some(Entry {
        name: bytes,
        ino,
        d_type,
    })
}

fn last_errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(-1)
}

#[test]
fn two_entries_then_exhausted() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("alpha"), b"a").unwrap();
    std::fs::create_dir(tmp.path().join("beta")).unwrap();

    let dir = Dir::open(tmp.path());
    let mut seen = Vec::new();
    let mut reads = 0;
    while let Some(entry) = read_entry(&dir) {
        reads += 1;
        if entry.name != b"." && entry.name != b".." {
            seen.push(entry);
        }
    }
    // "." and ".." plus the two real entries, then one failed read.
    assert_eq!(reads, 4);
    assert_eq!(last_errno(), 0, "end of stream must leave errno clear");
    assert!(read_entry(&dir).is_none());

    seen.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].name, b"alpha");
    assert_eq!(seen[1].name, b"beta");

    let alpha_meta = std::fs::symlink_metadata(tmp.path().join("alpha")).unwrap();
    let beta_meta = std::fs::symlink_metadata(tmp.path().join("beta")).unwrap();
    assert_eq!(seen[0].ino, alpha_meta.ino());
    assert_eq!(seen[1].ino, beta_meta.ino());

    // Some filesystems report DT_UNKNOWN; otherwise the tag must be right.
    assert!(matches!(seen[0].d_type, libc::DT_REG | libc::DT_UNKNOWN));
    assert!(matches!(seen[1].d_type, libc::DT_DIR | libc::DT_UNKNOWN));
}

#[test]
fn empty_directory_yields_only_special_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = Dir::open(tmp.path());
    let mut names = Vec::new();
    while let Some(entry) = read_entry(&dir) {
        names.push(entry.name);
    }
    names.sort();
    assert_eq!(names, vec![b".".to_vec(), b"..".to_vec()]);
}

#[test]
fn name_length_excludes_terminator() {
    let tmp = tempfile::tempdir().unwrap();
    let long = "n".repeat(200);
    std::fs::write(tmp.path().join(&long), b"").unwrap();

    let dir = Dir::open(tmp.path());
    let mut found = false;
    while let Some(entry) = read_entry(&dir) {
        if entry.name.len() > 2 {
            assert_eq!(entry.name, long.as_bytes());
            found = true;
        }
    }
    assert!(found);
}

#[test]
fn readdir_rejects_null_arguments() {
    let mut name: *const c_char = std::ptr::null();
    let mut len = 0usize;
    let mut ino = 0u64;
    let mut d_type = 0u8;
    let ok = unsafe {
        C_readdir64(
            std::ptr::null_mut(),
            &mut name,
            &mut len,
            &mut ino,
            &mut d_type,
        )
    };
    assert!(!ok);
    assert_eq!(last_errno(), libc::EBADF);

    let tmp = tempfile::tempdir().unwrap();
    let dir = Dir::open(tmp.path());
    let ok = unsafe { C_readdir64(dir.0, std::ptr::null_mut(), &mut len, &mut ino, &mut d_type) };
    assert!(!ok);
    assert_eq!(last_errno(), libc::EFAULT);
}

#[test]
fn fstatat_matches_std_metadata() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("file"), b"payload").unwrap();
    let dirfd = File::open(tmp.path()).unwrap();

    let name = CString::new("file").unwrap();
    let (mut dev, mut ino, mut mode) = (0u64, 0u64, 0u64);
    let ok = unsafe {
        C_fstatat64(
            dirfd.as_raw_fd(),
            name.as_ptr(),
            libc::AT_SYMLINK_NOFOLLOW,
            &mut dev,
            &mut ino,
            &mut mode,
        )
    };
    assert!(ok);

    let meta = std::fs::symlink_metadata(tmp.path().join("file")).unwrap();
    assert_eq!(dev, meta.dev());
    assert_eq!(ino, meta.ino());
    assert_eq!(mode, u64::from(meta.mode()));
    assert_eq!(mode & u64::from(libc::S_IFMT), u64::from(libc::S_IFREG));
}

#[test]
fn fstatat_nofollow_reports_the_link_itself() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("target"), b"").unwrap();
    std::os::unix::fs::symlink("target", tmp.path().join("link")).unwrap();
    let dirfd = File::open(tmp.path()).unwrap();
    let name = CString::new("link").unwrap();

    let (mut dev, mut ino, mut mode) = (0u64, 0u64, 0u64);
    let ok = unsafe {
        C_fstatat64(
            dirfd.as_raw_fd(),
            name.as_ptr(),
            libc::AT_SYMLINK_NOFOLLOW,
            &mut dev,
            &mut ino,
            &mut mode,
        )
    };
    assert!(ok);
    assert_eq!(mode & u64::from(libc::S_IFMT), u64::from(libc::S_IFLNK));

    let ok = unsafe {
        C_fstatat64(
            dirfd.as_raw_fd(),
            name.as_ptr(),
            0,
            &mut dev,
            &mut ino,
            &mut mode,
        )
    };
    assert!(ok);
    assert_eq!(mode & u64::from(libc::S_IFMT), u64::from(libc::S_IFREG));
}

#[test]
fn fstatat_missing_path_leaves_outputs_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let dirfd = File::open(tmp.path()).unwrap();
    let name = CString::new("does-not-exist").unwrap();

    let (mut dev, mut ino, mut mode) = (u64::MAX, u64::MAX - 1, u64::MAX - 2);
    let ok = unsafe {
        C_fstatat64(
            dirfd.as_raw_fd(),
            name.as_ptr(),
            libc::AT_SYMLINK_NOFOLLOW,
            &mut dev,
            &mut ino,
            &mut mode,
        )
    };
    assert!(!ok);
    assert_eq!(last_errno(), libc::ENOENT);
    assert_eq!((dev, ino, mode), (u64::MAX, u64::MAX - 1, u64::MAX - 2));
}

#[test]
fn fstatat_bad_descriptor_fails() {
    let name = CString::new("anything").unwrap();
    let (mut dev, mut ino, mut mode) = (0u64, 0u64, 0u64);
    let ok = unsafe { C_fstatat64(-1, name.as_ptr(), 0, &mut dev, &mut ino, &mut mode) };
    assert!(!ok);
    assert_eq!(last_errno(), libc::EBADF);
}
