// All extern "C" exports take raw pointers from the host runtime; the pointer
// contract is documented once per module rather than per function.
#![allow(clippy::missing_safety_doc)]
// Exported symbol names are fixed by the host's foreign-call table.
#![allow(non_snake_case)]
//! # platshim-abi
//!
//! `extern "C"` boundary between a host runtime and the platform's C library.
//!
//! This crate produces a `cdylib` exposing small functions that translate
//! platform-shaped interfaces (macro-only constants, `struct dirent`,
//! `struct stat`, `timeval`/`timespec`/`rusage`, `time_t`) into a fixed,
//! 64-bit-safe form. Every function maps onto at most one system call.
//!
//! # Error model
//!
//! ```text
//! host call -> null-pointer check -> narrow (fatal on overflow) -> libc -> widen -> return
//! ```
//!
//! Expected failures return `false` (or the native negative result) and leave
//! `errno` describing the cause. A wide value that does not fit its native
//! field is a caller defect: the layer logs one structured record and aborts.

#[macro_use]
mod macros;

pub mod config;
pub mod consts_abi;
pub mod dirent_abi;
mod errno;
pub mod fatal;
pub mod locale_abi;
pub mod log;
pub mod resource_abi;
pub mod stat_abi;
pub mod stdio_abi;
pub mod time_abi;
pub mod util;

pub use platshim_core::resource::Rusage64;
pub use platshim_core::time::{Timespec64, Timeval64};
