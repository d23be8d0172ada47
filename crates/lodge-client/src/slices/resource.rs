//! Generic actions for the content slices.
//!
//! Events and meetings behave identically from the client's point of
//! view; a [`ResourceKind`] names the route prefix, the entity type, the
//! fields the admin forms insist on, and which slice of the state the
//! kind owns.  Every mutation that succeeds triggers a full re-fetch, so
//! the cached list never drifts from server order.

use serde::de::DeserializeOwned;
use std::sync::MutexGuard;
use tracing::debug;
use uuid::Uuid;

use lodge_shared::types::is_known_category;
use lodge_shared::{Envelope, ResourceFields, UploadResponse};

use crate::http::{ApiClient, ClientError};
use crate::state::{AppState, ResourceSlice, SharedState};

/// Client-side descriptor of one content resource.
pub trait ResourceKind {
    type Entity: DeserializeOwned + Clone + PartialEq + Send + 'static;

    /// API route prefix, e.g. `/api/events`.
    const BASE_PATH: &'static str;

    /// Fields the admin forms require before submitting a create.  This
    /// is a courtesy check only; the server applies its own rules.
    const CLIENT_REQUIRED: &'static [&'static str];

    /// Borrow this kind's slice out of the app state.
    fn slice_mut(state: &mut AppState) -> &mut ResourceSlice<Self::Entity>;
}

fn lock(state: &SharedState) -> Result<MutexGuard<'_, AppState>, ClientError> {
    state.lock().map_err(|_| ClientError::Poisoned)
}

/// Mark the slice pending.
fn begin<K: ResourceKind>(state: &SharedState) -> Result<(), ClientError> {
    let mut guard = lock(state)?;
    let slice = K::slice_mut(&mut guard);
    slice.is_loading = true;
    slice.error = None;
    Ok(())
}

/// Unwrap a `{success, data}` envelope or surface its message.
fn expect_data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    if envelope.success {
        envelope
            .data
            .ok_or_else(|| ClientError::Api("response carried no data".into()))
    } else {
        Err(ClientError::Api(
            envelope
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        ))
    }
}

/// Fetch the whole collection and replace the cached list.
///
/// On rejection the list resets to empty (fail closed) and the error is
/// recorded on the slice; stale data is never shown as if it were fresh.
pub async fn fetch_all<K: ResourceKind>(
    api: &ApiClient,
    state: &SharedState,
) -> Result<(), ClientError> {
    begin::<K>(state)?;

    let result: Result<Envelope<Vec<K::Entity>>, ClientError> = api.get(K::BASE_PATH).await;
    let outcome = result.and_then(expect_data);

    let mut guard = lock(state)?;
    let slice = K::slice_mut(&mut guard);
    slice.is_loading = false;

    match outcome {
        Ok(list) => {
            debug!(path = K::BASE_PATH, count = list.len(), "collection fetched");
            slice.list = list;
            Ok(())
        }
        Err(e) => {
            slice.list.clear();
            slice.error = Some(e.to_string());
            Err(e)
        }
    }
}

/// Create a record, then reconcile the list with the server.
pub async fn create<K: ResourceKind>(
    api: &ApiClient,
    state: &SharedState,
    fields: &ResourceFields,
) -> Result<K::Entity, ClientError> {
    if let Some(missing) = fields.missing_required(K::CLIENT_REQUIRED).first().copied() {
        return Err(ClientError::Validation(missing));
    }
    if let Some(category) = fields.get("category") {
        if !is_known_category(category) {
            return Err(ClientError::Validation("category"));
        }
    }

    begin::<K>(state)?;

    let result: Result<Envelope<K::Entity>, ClientError> =
        api.post(&format!("{}/add", K::BASE_PATH), fields).await;
    let outcome = result.and_then(expect_data);

    settle::<K>(state, outcome.as_ref().err())?;
    let created = outcome?;

    fetch_all::<K>(api, state).await?;
    Ok(created)
}

/// Patch a record, then reconcile the list with the server.
pub async fn update<K: ResourceKind>(
    api: &ApiClient,
    state: &SharedState,
    id: Uuid,
    fields: &ResourceFields,
) -> Result<K::Entity, ClientError> {
    begin::<K>(state)?;

    let result: Result<Envelope<K::Entity>, ClientError> =
        api.put(&format!("{}/{id}", K::BASE_PATH), fields).await;
    let outcome = result.and_then(expect_data);

    settle::<K>(state, outcome.as_ref().err())?;
    let updated = outcome?;

    fetch_all::<K>(api, state).await?;
    Ok(updated)
}

/// Delete a record, then reconcile the list with the server.
pub async fn delete<K: ResourceKind>(
    api: &ApiClient,
    state: &SharedState,
    id: Uuid,
) -> Result<(), ClientError> {
    begin::<K>(state)?;

    let result: Result<Envelope<()>, ClientError> =
        api.delete(&format!("{}/{id}", K::BASE_PATH)).await;
    let outcome = result.and_then(|envelope| {
        if envelope.success {
            Ok(())
        } else {
            Err(ClientError::Api(
                envelope
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    });

    settle::<K>(state, outcome.as_ref().err())?;
    outcome?;

    fetch_all::<K>(api, state).await?;
    Ok(())
}

/// Upload an image for later attachment to a record.  Independent of the
/// list lifecycle: only the image flags move.
pub async fn upload_image<K: ResourceKind>(
    api: &ApiClient,
    state: &SharedState,
    file_name: String,
    bytes: Vec<u8>,
) -> Result<String, ClientError> {
    {
        let mut guard = lock(state)?;
        let slice = K::slice_mut(&mut guard);
        slice.image_loading = true;
        slice.uploaded_image_url = None;
    }

    let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
    let form = reqwest::multipart::Form::new().part("my_file", part);

    let result: Result<UploadResponse, ClientError> = api
        .post_multipart(&format!("{}/upload-image", K::BASE_PATH), form)
        .await;

    let mut guard = lock(state)?;
    let slice = K::slice_mut(&mut guard);
    slice.image_loading = false;

    match result {
        Ok(response) if response.success => {
            let url = response
                .result
                .map(|r| r.secure_url)
                .ok_or_else(|| ClientError::Api("upload response carried no URL".into()))?;
            slice.uploaded_image_url = Some(url.clone());
            Ok(url)
        }
        Ok(response) => Err(ClientError::Api(
            response
                .message
                .unwrap_or_else(|| "upload failed".to_string()),
        )),
        Err(e) => Err(e),
    }
}

/// Open (or close) a record in the detail view.
pub fn set_details<K: ResourceKind>(
    state: &SharedState,
    details: Option<K::Entity>,
) -> Result<(), ClientError> {
    let mut guard = lock(state)?;
    K::slice_mut(&mut guard).details = details;
    Ok(())
}

/// Close the detail view.
pub fn clear_details<K: ResourceKind>(state: &SharedState) -> Result<(), ClientError> {
    set_details::<K>(state, None)
}

/// Clear the loading flag and record the error, if any.
fn settle<K: ResourceKind>(
    state: &SharedState,
    error: Option<&ClientError>,
) -> Result<(), ClientError> {
    let mut guard = lock(state)?;
    let slice = K::slice_mut(&mut guard);
    slice.is_loading = false;
    if let Some(e) = error {
        slice.error = Some(e.to_string());
    }
    Ok(())
}
