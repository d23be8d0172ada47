//! # lodge-store
//!
//! Persistence for the Lodge back office, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection`, runs schema migrations on open, and provides
//! typed helpers: user storage plus one generic CRUD implementation
//! shared by every content resource, parameterized by a schema
//! descriptor and an explicit merge policy.

pub mod database;
pub mod migrations;
pub mod models;
pub mod resource;
pub mod users;

mod error;

pub use database::Database;
pub use error::StoreError;
pub use models::User;
pub use resource::{MergePolicy, Resource};
