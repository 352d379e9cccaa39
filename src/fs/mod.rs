//! Filesystem utilities for deskscript.

pub mod atomic;

pub use atomic::atomic_write_file;
