//! The meetings slice.

use lodge_shared::Meeting;

use crate::state::{AppState, ResourceSlice};

use super::resource::ResourceKind;

/// Kind marker binding the generic resource actions to the meetings
/// slice.
pub struct Meetings;

impl ResourceKind for Meetings {
    type Entity = Meeting;

    const BASE_PATH: &'static str = "/api/meetings";

    // The meeting schema is enforced server-side; the client passes
    // whatever the form holds.
    const CLIENT_REQUIRED: &'static [&'static str] = &[];

    fn slice_mut(state: &mut AppState) -> &mut ResourceSlice<Meeting> {
        &mut state.meetings
    }
}

#[cfg(test)]
mod tests {
    use super::super::resource;
    use super::super::testutil::spawn_server;
    use super::*;
    use crate::http::{ApiClient, ClientError};
    use crate::state::AppState;
    use lodge_shared::ResourceFields;

    fn agm() -> ResourceFields {
        ResourceFields {
            title: Some("AGM".into()),
            description: Some("Annual general meeting".into()),
            date: Some("2025-05-01".into()),
            time: Some("19:00".into()),
            location: Some("Boardroom".into()),
            for_whom: Some("committee".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn server_rejects_incomplete_meetings() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        let incomplete = ResourceFields {
            title: Some("AGM".into()),
            ..Default::default()
        };
        let result = resource::create::<Meetings>(&api, &state, &incomplete).await;
        match result {
            Err(ClientError::Api(message)) => {
                assert!(message.starts_with("Missing required field"))
            }
            other => panic!("expected an API rejection, got {other:?}"),
        }

        let guard = state.lock().unwrap();
        assert!(!guard.meetings.is_loading);
        assert!(guard.meetings.error.is_some());
        drop(guard);

        server.abort();
    }

    #[tokio::test]
    async fn blanking_a_meeting_field_sticks() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        let created = resource::create::<Meetings>(&api, &state, &agm())
            .await
            .unwrap();
        assert_eq!(created.image, "", "image defaults to the empty string");

        // Overwrite policy: an empty description really empties it --
        // the behavior that distinguishes meetings from events.
        let patch = ResourceFields {
            description: Some(String::new()),
            ..Default::default()
        };
        let updated = resource::update::<Meetings>(&api, &state, created.id, &patch)
            .await
            .unwrap();
        assert_eq!(updated.description, "");

        let guard = state.lock().unwrap();
        assert_eq!(guard.meetings.list[0].description, "");
        drop(guard);

        server.abort();
    }

    #[tokio::test]
    async fn details_can_be_set_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        let created = resource::create::<Meetings>(&api, &state, &agm())
            .await
            .unwrap();

        resource::set_details::<Meetings>(&state, Some(created.clone())).unwrap();
        assert_eq!(
            state.lock().unwrap().meetings.details.as_ref().map(|m| m.id),
            Some(created.id)
        );

        resource::clear_details::<Meetings>(&state).unwrap();
        assert!(state.lock().unwrap().meetings.details.is_none());

        server.abort();
    }
}
