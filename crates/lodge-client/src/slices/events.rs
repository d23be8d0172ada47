//! The events slice.

use lodge_shared::Event;

use crate::state::{AppState, ResourceSlice};

use super::resource::ResourceKind;

/// Kind marker binding the generic resource actions to the events slice.
pub struct Events;

impl ResourceKind for Events {
    type Entity = Event;

    const BASE_PATH: &'static str = "/api/events";

    // The admin event form refuses to submit without these; the server
    // itself accepts anything.
    const CLIENT_REQUIRED: &'static [&'static str] =
        &["title", "description", "date", "location"];

    fn slice_mut(state: &mut AppState) -> &mut ResourceSlice<Event> {
        &mut state.events
    }
}
