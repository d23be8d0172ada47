//! The auth slice.
//!
//! Four actions mirror the four auth endpoints.  Two of them bend the
//! usual error rules on purpose: `check_auth` fails silently so an
//! anonymous visit never looks like an error, and `logout` always
//! reports success and drops the local identity even when the request
//! itself fails.

use serde::Serialize;
use tracing::{debug, warn};

use lodge_shared::{AuthResponse, UserInfo};

use crate::http::{ApiClient, ClientError};
use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload<'a> {
    user_name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

fn begin(state: &SharedState) -> Result<(), ClientError> {
    let mut guard = state.lock().map_err(|_| ClientError::Poisoned)?;
    guard.auth.is_loading = true;
    Ok(())
}

/// Settle the auth slice.  `user` is the verified identity, or `None`
/// for the anonymous state.
fn settle(state: &SharedState, user: Option<UserInfo>) -> Result<(), ClientError> {
    let mut guard = state.lock().map_err(|_| ClientError::Poisoned)?;
    guard.auth.is_loading = false;
    guard.auth.is_authenticated = user.is_some();
    guard.auth.user = user;
    Ok(())
}

/// Create an account.  Success does not log the user in; the view moves
/// on to the login form.
pub async fn register(
    api: &ApiClient,
    state: &SharedState,
    user_name: &str,
    email: &str,
    password: &str,
) -> Result<(), ClientError> {
    begin(state)?;

    let result: Result<AuthResponse, ClientError> = api
        .post(
            "/api/auth/register",
            &RegisterPayload {
                user_name,
                email,
                password,
            },
        )
        .await;

    settle(state, None)?;

    match result {
        Ok(response) if response.success => Ok(()),
        Ok(response) => Err(ClientError::Api(
            response
                .message
                .unwrap_or_else(|| "Registration failed".to_string()),
        )),
        Err(e) => Err(e),
    }
}

/// Log in.  On success the identity cookie lands in the HTTP client's
/// jar and the slice holds the echoed user fields.
pub async fn login(
    api: &ApiClient,
    state: &SharedState,
    email: &str,
    password: &str,
) -> Result<UserInfo, ClientError> {
    begin(state)?;

    let result: Result<AuthResponse, ClientError> = api
        .post("/api/auth/login", &LoginPayload { email, password })
        .await;

    match result {
        Ok(response) if response.success => {
            let user = response
                .user
                .ok_or_else(|| ClientError::Api("login response carried no user".into()))?;
            settle(state, Some(user.clone()))?;
            debug!(email = %user.email, "logged in");
            Ok(user)
        }
        Ok(response) => {
            settle(state, None)?;
            Err(ClientError::Api(
                response
                    .message
                    .unwrap_or_else(|| "Login failed".to_string()),
            ))
        }
        Err(e) => {
            settle(state, None)?;
            Err(e)
        }
    }
}

/// Log out.  Idempotent from the view's perspective: the local identity
/// is dropped and success reported even if the server was unreachable.
pub async fn logout(api: &ApiClient, state: &SharedState) -> Result<(), ClientError> {
    begin(state)?;

    let result: Result<AuthResponse, ClientError> = api.post_empty("/api/auth/logout").await;
    if let Err(e) = result {
        warn!(error = %e, "logout request failed; clearing local session anyway");
    }

    settle(state, None)
}

/// Re-validate the identity cookie.  Designed to fail silently: any
/// failure, transport or auth, just leaves the slice anonymous.
pub async fn check_auth(api: &ApiClient, state: &SharedState) -> Result<(), ClientError> {
    begin(state)?;

    let result: Result<AuthResponse, ClientError> = api.get("/api/auth/check-auth").await;

    let user = match result {
        Ok(response) if response.success => response.user,
        _ => None,
    };

    settle(state, user)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::spawn_server;
    use super::*;
    use crate::state::AppState;
    use lodge_shared::Role;

    #[tokio::test]
    async fn register_login_check_auth_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        register(&api, &state, "alice", "a@x.com", "secret123")
            .await
            .unwrap();
        // Registration alone does not authenticate.
        assert!(!state.lock().unwrap().auth.is_authenticated);

        let user = login(&api, &state, "a@x.com", "secret123").await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, Role::Member);

        {
            let guard = state.lock().unwrap();
            assert!(guard.auth.is_authenticated);
            assert_eq!(guard.auth.user.as_ref().unwrap().user_name, "alice");
        }

        // The cookie jar carries the token; check-auth sees the same
        // identity.
        check_auth(&api, &state).await.unwrap();
        {
            let guard = state.lock().unwrap();
            assert!(guard.auth.is_authenticated);
            assert_eq!(guard.auth.user.as_ref().unwrap().email, "a@x.com");
            assert_eq!(guard.auth.user.as_ref().unwrap().id, user.id);
        }

        server.abort();
    }

    #[tokio::test]
    async fn wrong_password_leaves_the_slice_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        register(&api, &state, "alice", "a@x.com", "secret123")
            .await
            .unwrap();

        let result = login(&api, &state, "a@x.com", "wrong").await;
        assert!(matches!(result, Err(ClientError::Api(_))));

        let guard = state.lock().unwrap();
        assert!(!guard.auth.is_loading);
        assert!(!guard.auth.is_authenticated);
        assert!(guard.auth.user.is_none());
        drop(guard);

        server.abort();
    }

    #[tokio::test]
    async fn check_auth_is_silent_for_anonymous_visitors() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        // No cookie in the jar: the server answers 401, the action
        // still returns Ok.
        check_auth(&api, &state).await.unwrap();
        assert!(!state.lock().unwrap().auth.is_authenticated);

        server.abort();
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_survives_a_dead_server() {
        let dir = tempfile::tempdir().unwrap();
        let (base_url, server) = spawn_server(&dir).await;
        let api = ApiClient::new(base_url).unwrap();
        let state = AppState::new_shared();

        register(&api, &state, "alice", "a@x.com", "secret123")
            .await
            .unwrap();
        login(&api, &state, "a@x.com", "secret123").await.unwrap();

        logout(&api, &state).await.unwrap();
        assert!(!state.lock().unwrap().auth.is_authenticated);

        // Second logout, then a third with the server gone.
        logout(&api, &state).await.unwrap();
        server.abort();
        logout(&api, &state).await.unwrap();
        assert!(state.lock().unwrap().auth.user.is_none());

        // The cleared cookie no longer authenticates (even if the jar
        // kept it, it expired immediately).
        let _ = check_auth(&api, &state).await;
        assert!(!state.lock().unwrap().auth.is_authenticated);
    }
}
