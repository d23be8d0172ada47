//! HTTP plumbing shared by every slice action.
//!
//! [`ApiClient`] wraps a `reqwest::Client` with an enabled cookie store,
//! so the identity cookie set at login rides along automatically and is
//! never readable by the rest of the crate.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, bad JSON).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{0}")]
    Api(String),

    /// A form field required client-side was absent or empty.
    #[error("Missing required field: {0}")]
    Validation(&'static str),

    /// The shared state mutex was poisoned by a panicking holder.
    #[error("State lock poisoned")]
    Poisoned,
}

/// Thin typed client for the Lodge API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the API at `base_url` (e.g.
    /// `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        Ok(self.http.get(self.url(path)).send().await?.json().await?)
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        Ok(self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await?
            .json()
            .await?)
    }

    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        Ok(self.http.post(self.url(path)).send().await?.json().await?)
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        Ok(self
            .http
            .put(self.url(path))
            .json(body)
            .send()
            .await?
            .json()
            .await?)
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        Ok(self
            .http
            .delete(self.url(path))
            .send()
            .await?
            .json()
            .await?)
    }

    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<R, ClientError> {
        Ok(self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?
            .json()
            .await?)
    }
}
