//! Shelf application library
//!
//! Domain modules for books and sellers plus the bootstrap that wires them
//! into the kernel, database and HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use bootstrap::{migrate, registry, serve};
