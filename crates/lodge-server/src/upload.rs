//! Image upload pass-through.
//!
//! The API never stores image bytes itself: the multipart payload is
//! forwarded to the external asset host, which answers with a stable URL
//! the client may (or may not) attach to a record later.  Nothing
//! reconciles orphaned assets.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use lodge_shared::{UploadResponse, UploadResult};

use crate::api::AppState;
use crate::error::ServerError;

/// Multipart field name the clients send the file under.
pub const UPLOAD_FIELD: &str = "my_file";

/// Client for the external asset-hosting collaborator.
pub struct AssetHost {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AssetHost {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Forward one file to the asset host and return its stable URL.
    ///
    /// The host is configured lazily: an empty base URL only fails here,
    /// on first use.
    pub async fn upload(&self, file_name: String, data: Vec<u8>) -> Result<String, ServerError> {
        if self.base_url.is_empty() {
            return Err(ServerError::Upload("asset host not configured".into()));
        }

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ServerError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServerError::Upload(format!(
                "asset host returned {}",
                response.status()
            )));
        }

        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| ServerError::Upload(e.to_string()))?;

        Ok(result.secure_url)
    }
}

/// `POST /upload-image` -- accept a single file under [`UPLOAD_FIELD`]
/// and answer with the asset host's URL.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == UPLOAD_FIELD {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {e}")))?;

            let secure_url = state.asset_host.upload(file_name, data.to_vec()).await?;

            info!(url = %secure_url, size = data.len(), "image forwarded to asset host");

            return Ok(Json(UploadResponse {
                success: true,
                message: Some("Image uploaded successfully".into()),
                result: Some(UploadResult { secure_url }),
            }));
        }
    }

    Err(ServerError::BadRequest(format!(
        "Missing '{UPLOAD_FIELD}' field in multipart form"
    )))
}
