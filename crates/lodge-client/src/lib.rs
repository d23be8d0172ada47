//! # lodge-client
//!
//! Client library for the Lodge back office.  It keeps a local
//! [`state::AppState`] with three slices (`auth`, `events`, `meetings`),
//! each synchronized with the API through asynchronous actions that walk
//! the `pending -> fulfilled | rejected` lifecycle.  Mutations reconcile
//! by re-fetching the full collection rather than splicing the local
//! cache, so the list a view renders is always one the server produced.
//!
//! The identity token never touches this crate: it lives in an httpOnly
//! cookie managed by the HTTP client's cookie jar.

pub mod checkin;
pub mod http;
pub mod slices;
pub mod state;

pub use http::{ApiClient, ClientError};
pub use state::{AppState, AuthSlice, ResourceSlice, SharedState};
