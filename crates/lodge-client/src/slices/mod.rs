//! Slice actions.
//!
//! Each sub-module groups the asynchronous actions of one state slice.
//! Every action walks the same lifecycle: mark the slice loading, call
//! the API, then settle the slice from the outcome.  The two content
//! slices share one generic implementation in [`resource`].

pub mod auth;
pub mod events;
pub mod meetings;
pub mod resource;

#[cfg(test)]
pub(crate) mod testutil {
    //! Spins up a real API server on an ephemeral port so the actions
    //! are exercised end to end, cookies included.

    use std::sync::{Arc, Mutex};

    use lodge_server::api::{build_router, AppState as ServerState};
    use lodge_server::config::ServerConfig;
    use lodge_server::upload::AssetHost;
    use lodge_store::Database;

    pub async fn spawn_server(dir: &tempfile::TempDir) -> (String, tokio::task::JoinHandle<()>) {
        spawn_server_with_assets(dir, String::new()).await
    }

    pub async fn spawn_server_with_assets(
        dir: &tempfile::TempDir,
        asset_host_url: String,
    ) -> (String, tokio::task::JoinHandle<()>) {
        let db = Database::open_at(&dir.path().join("server.db")).unwrap();
        let state = ServerState {
            db: Arc::new(Mutex::new(db)),
            asset_host: Arc::new(AssetHost::new(asset_host_url, None)),
            config: Arc::new(ServerConfig::default()),
        };
        let router = build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        (format!("http://{addr}"), handle)
    }

    /// Stand-in for the external asset host: answers every upload with a
    /// fixed stable URL.
    pub async fn spawn_asset_stub() -> (String, tokio::task::JoinHandle<()>) {
        use axum::routing::post;
        use axum::{Json, Router};
        use lodge_shared::UploadResult;

        let stub = Router::new().route(
            "/upload",
            post(|| async {
                Json(UploadResult {
                    secure_url: "https://assets.test/badge.png".into(),
                })
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, stub).await.unwrap();
        });

        (format!("http://{addr}"), handle)
    }
}
