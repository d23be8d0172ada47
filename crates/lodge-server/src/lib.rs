//! # lodge-server
//!
//! The Lodge HTTP API: cookie/JWT authentication plus CRUD for the two
//! content collections (events and meetings) and a pass-through image
//! upload to the external asset host.
//!
//! The crate is a library so integration tests (and the client crate's
//! round-trip tests) can assemble the router in-process; the `lodge-server`
//! binary in `main.rs` is a thin wrapper around [`api::serve`].

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod resources;
pub mod upload;
