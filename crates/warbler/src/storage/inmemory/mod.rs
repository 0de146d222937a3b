//! In-memory storage backend.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. It enforces the
//! same NOT NULL, UNIQUE and cascade rules as the SQLite schema, so tests and
//! `--no-default-features` builds behave like the real database.

mod repository;

pub use repository::InMemoryRepository;
