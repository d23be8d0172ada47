//! Generic CRUD handlers over the content resources.
//!
//! Events and meetings expose the same route set and share one set of
//! handlers, parameterized by the store's [`Resource`] descriptor.  The
//! descriptor supplies the table, the required-at-create columns, and the
//! merge policy, so the two resources differ only in data, not in code.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use lodge_shared::{Envelope, ResourceFields};
use lodge_store::{Resource, StoreError};

use crate::api::AppState;
use crate::auth;
use crate::error::ServerError;
use crate::upload;

/// Build the route set for one resource: public list plus the mutation
/// routes.  When the instance closes contributions, every mutation is
/// gated behind an admin session.
pub fn router<R>(state: &AppState) -> Router<AppState>
where
    R: Resource + Serialize + Send + Sync + 'static,
{
    let mut mutations = Router::new()
        .route("/add", post(create::<R>))
        .route("/:id", put(update::<R>).delete(remove::<R>))
        .route("/upload-image", post(upload::upload_image));

    if !state.config.open_contributions {
        mutations = mutations.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));
    }

    Router::new().route("/", get(list_all::<R>)).merge(mutations)
}

/// `GET /` -- all records, ordered by ascending date.  An empty
/// collection is a valid, non-error result.
pub async fn list_all<R>(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<R>>>, ServerError>
where
    R: Resource + Serialize + Send + Sync + 'static,
{
    let records = state.db()?.list_records::<R>()?;
    Ok(Json(Envelope::data(records)))
}

/// `POST /add` -- persist a new record.
///
/// The descriptor's required columns must be present and non-empty;
/// everything else defaults.  Returns the stored record, generated id and
/// timestamps included.
pub async fn create<R>(
    State(state): State<AppState>,
    Json(fields): Json<ResourceFields>,
) -> Result<(StatusCode, Json<Envelope<R>>), ServerError>
where
    R: Resource + Serialize + Send + Sync + 'static,
{
    if let Some(missing) = fields.missing_required(R::REQUIRED).first().copied() {
        return Err(ServerError::MissingField(missing));
    }

    let now = Utc::now();
    let record = R::from_parts(Uuid::new_v4(), fields.values_for(R::FIELDS), now, now);
    state.db()?.create_record(&record)?;

    info!(id = %record.id(), resource = R::TABLE, "record created");

    Ok((StatusCode::CREATED, Json(Envelope::data(record))))
}

/// `PUT /:id` -- partial update, merged per the resource's policy.
pub async fn update<R>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(fields): Json<ResourceFields>,
) -> Result<Json<Envelope<R>>, ServerError>
where
    R: Resource + Serialize + Send + Sync + 'static,
{
    let updated = state
        .db()?
        .update_record::<R>(id, &fields.values_for(R::FIELDS))
        .map_err(|e| match e {
            StoreError::NotFound => ServerError::NotFound(R::NAME),
            other => other.into(),
        })?;

    info!(id = %id, resource = R::TABLE, "record updated");

    Ok(Json(Envelope::data(updated)))
}

/// `DELETE /:id` -- permanent, irrecoverable removal.
pub async fn remove<R>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ServerError>
where
    R: Resource + Serialize + Send + Sync + 'static,
{
    if !state.db()?.delete_record::<R>(id)? {
        return Err(ServerError::NotFound(R::NAME));
    }

    info!(id = %id, resource = R::TABLE, "record deleted");

    Ok(Json(Envelope::ok(format!("{} deleted successfully", R::NAME))))
}
