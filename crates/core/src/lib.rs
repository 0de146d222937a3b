//! Functional core for Warbler.
//!
//! Domain types, validation, and the repository traits that the storage
//! backends implement. Nothing in here performs I/O directly; operations that
//! need persistence take a repository trait object.

#[cfg(feature = "auth")]
pub mod auth;
pub mod social;
pub mod storage;
