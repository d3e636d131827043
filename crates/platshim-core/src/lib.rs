//! # platshim-core
//!
//! Safe, platform-independent building blocks for the platshim ABI layer.
//!
//! This crate holds the 64-bit wide value records exchanged with the host
//! runtime, the checked narrowing primitives used before any wide value is
//! handed to the OS, and per-target tables for platform facts that the `libc`
//! crate does not carry. Syscalls live in `platshim-abi`; no `unsafe` code is
//! permitted here.

#![deny(unsafe_code)]

pub mod consts;
pub mod narrow;
pub mod resource;
pub mod time;
