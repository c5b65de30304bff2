//! Biblion Library Management Core
//!
//! The business-logic layer of a small library system: user accounts with
//! subscription tiers, a book catalog with per-copy status tracking, loans
//! with due dates and late-return penalties, reservations with a FIFO
//! notification queue, and aggregate statistics. Persistence is a pluggable
//! whole-state snapshot store; the bundled binary is a thin CLI front end.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::{LibraryError, LibraryResult};
pub use services::LibraryService;
pub use state::LibraryState;
pub use store::{JsonStore, MemoryStore, SnapshotStore};
