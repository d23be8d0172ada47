//! # lodge-shared
//!
//! Wire types shared between the Lodge API server and its clients:
//! response envelopes, domain entities, user projections, and the signed
//! identity token. Nothing in this crate touches the network or the
//! database; it is the contract both sides agree on.

pub mod envelope;
pub mod token;
pub mod types;

pub use envelope::{AuthResponse, Envelope, UploadResponse, UploadResult};
pub use token::{AuthClaims, TokenError};
pub use types::{Event, Meeting, ResourceFields, Role, UserInfo};
