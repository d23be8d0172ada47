//! Application state shared across all slice actions.
//!
//! The [`AppState`] struct is wrapped in `Arc<Mutex<>>` and handed to
//! every action; views read it after each action settles.  Lock guards
//! are only ever held for a synchronous mutation, never across an await
//! point.

use std::sync::{Arc, Mutex};

use lodge_shared::{Event, Meeting, UserInfo};

/// Identity slice: who (if anyone) is logged in right now.
#[derive(Debug, Clone, Default)]
pub struct AuthSlice {
    /// True while an auth action is in flight.
    pub is_loading: bool,
    pub is_authenticated: bool,
    /// Present exactly when `is_authenticated` is true.
    pub user: Option<UserInfo>,
}

/// One content collection's client-side cache.
///
/// `list` mirrors the server's collection as of the last successful
/// fetch; every mutation re-fetches rather than patching it locally.
#[derive(Debug, Clone)]
pub struct ResourceSlice<T> {
    pub is_loading: bool,
    pub list: Vec<T>,
    /// Record currently opened in a detail view, if any.
    pub details: Option<T>,
    /// Message of the last rejected action, cleared on the next trigger.
    pub error: Option<String>,
    /// Independent lifecycle of the image upload widget.
    pub image_loading: bool,
    pub uploaded_image_url: Option<String>,
}

impl<T> Default for ResourceSlice<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            list: Vec::new(),
            details: None,
            error: None,
            image_loading: false,
            uploaded_image_url: None,
        }
    }
}

/// Central application state: one slice per concern.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthSlice,
    pub events: ResourceSlice<Event>,
    pub meetings: ResourceSlice<Meeting>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state behind the lock the actions expect.
    pub fn new_shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }
}

/// Handle shared between the view layer and the slice actions.
pub type SharedState = Arc<Mutex<AppState>>;
