//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `warbler_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always compiled. It backs the application when
//! `sqlite` is disabled, and the router tests.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p warbler
//! ```
//!
//! Build with in-memory storage only:
//! ```bash
//! cargo build -p warbler --no-default-features
//! ```

// Only the tests use the in-memory backend while `sqlite` is on.
#[cfg_attr(feature = "sqlite", allow(dead_code))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg_attr(feature = "sqlite", allow(unused_imports))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
