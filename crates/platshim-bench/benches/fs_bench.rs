//! Filesystem wrapper benchmarks: `fstatat` and a full `readdir` sweep.

use std::ffi::{CString, c_char};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use platshim_abi::dirent_abi::C_readdir64;
use platshim_abi::stat_abi::C_fstatat64;

fn bench_fstatat(c: &mut Criterion) {
    let path = CString::new("/").unwrap();
    let mut group = c.benchmark_group("fstatat");

    group.bench_function("platshim", |b| {
        let (mut dev, mut ino, mut mode) = (0u64, 0u64, 0u64);
        b.iter(|| {
            let ok = unsafe {
                C_fstatat64(
                    libc::AT_FDCWD,
                    path.as_ptr(),
                    0,
                    &mut dev,
                    &mut ino,
                    &mut mode,
                )
            };
            black_box((ok, dev, ino, mode));
        });
    });

    group.bench_function("libc", |b| {
        let mut st: libc::stat = unsafe { std::mem::zeroed() };
        b.iter(|| {
            let rc = unsafe { libc::fstatat(libc::AT_FDCWD, path.as_ptr(), &mut st, 0) };
            black_box((rc, st.st_ino));
        });
    });
    group.finish();
}

fn populate(entries: usize) -> std::path::PathBuf {
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("platshim-bench-{pid}-{entries}"));
    std::fs::create_dir_all(&dir).unwrap();
    for i in 0..entries {
        std::fs::write(dir.join(format!("entry-{i:05}")), b"").unwrap();
    }
    dir
}

fn sweep(dir: &CString) -> usize {
    let dirp = unsafe { libc::opendir(dir.as_ptr()) };
    assert!(!dirp.is_null());
    let mut name: *const c_char = std::ptr::null();
    let (mut len, mut ino, mut ty) = (0usize, 0u64, 0u8);
    let mut count = 0;
    while unsafe { C_readdir64(dirp, &mut name, &mut len, &mut ino, &mut ty) } {
        count += 1;
        black_box((name, len, ino, ty));
    }
    unsafe { libc::closedir(dirp) };
    count
}

fn bench_readdir(c: &mut Criterion) {
    let mut group = c.benchmark_group("readdir_sweep");

    for &entries in &[16usize, 256, 4096] {
        let dir = populate(entries);
        let cdir = CString::new(dir.to_str().unwrap()).unwrap();
        group.throughput(Throughput::Elements(entries as u64));
        group.bench_with_input(BenchmarkId::new("platshim", entries), &cdir, |b, d| {
            b.iter(|| black_box(sweep(d)));
        });
        std::fs::remove_dir_all(&dir).unwrap();
    }
    group.finish();
}

criterion_group!(benches, bench_fstatat, bench_readdir);
criterion_main!(benches);
