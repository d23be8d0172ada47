//! Authentication: register, login, logout, check-auth, and the request
//! gate used by protected routes.
//!
//! The identity token is an HS256 JWT minted by [`lodge_shared::token`]
//! and carried exclusively in an httpOnly cookie named `token`.  The
//! middleware re-verifies it on every protected request and threads the
//! decoded claims through request extensions, so handlers receive a
//! request-scoped identity value rather than consulting global state.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::{Extension, Json};
use chrono::Utc;
use cookie::{Cookie, SameSite};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use lodge_shared::token::{self, AuthClaims};
use lodge_shared::{AuthResponse, Role};
use lodge_store::User;

use crate::api::AppState;
use crate::error::ServerError;

/// Name of the identity cookie.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/auth/register`
///
/// Hashes the password (bcrypt, cost factor 12) and persists a new member
/// account.  Registration never logs the user in and never echoes the
/// password or its hash.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<AuthResponse>, ServerError> {
    // bcrypt at cost 12 takes a noticeable slice of CPU time; keep it off
    // the async workers.
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))?
    .map_err(|e| ServerError::Internal(e.to_string()))?;

    let user = User {
        id: Uuid::new_v4(),
        user_name: payload.user_name,
        email: payload.email,
        password_hash,
        role: Role::Member,
        created_at: Utc::now(),
    };

    state.db()?.create_user(&user)?;

    info!(email = %user.email, "user registered");

    Ok(Json(AuthResponse::ok("Registration successful")))
}

/// `POST /api/auth/login`
///
/// On success, sets the identity cookie and echoes the non-secret user
/// fields.  An unknown email and a wrong password are distinct failures
/// internally but render identically on the wire.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ServerError> {
    let user = state
        .db()?
        .find_user_by_email(&payload.email)?
        .ok_or(ServerError::UnknownUser)?;

    let password = payload.password;
    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    if !matches {
        return Err(ServerError::WrongPassword);
    }

    let user_info = user.to_info();
    let jwt = token::issue(
        &user_info,
        &state.config.jwt_secret,
        chrono::Duration::seconds(state.config.jwt_ttl_secs),
    )
    .map_err(|e| ServerError::Internal(e.to_string()))?;

    let cookie = session_cookie(jwt, state.config.jwt_ttl_secs, state.config.secure_cookies);

    info!(email = %user_info.email, role = %user_info.role, "user logged in");

    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(AuthResponse::user(user_info, "Logged in successfully")),
    ))
}

/// `POST /api/auth/logout`
///
/// Clears the identity cookie.  Idempotent: reports success whether or
/// not a session existed.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = removal_cookie(state.config.secure_cookies);

    (
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(AuthResponse::ok("Logged out successfully")),
    )
}

/// `GET /api/auth/check-auth`
///
/// Runs behind [`require_auth`]; simply reflects the verified identity.
pub async fn check_auth(Extension(claims): Extension<AuthClaims>) -> Json<AuthResponse> {
    Json(AuthResponse::user(claims.user_info(), "Authenticated user"))
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

/// Reject the request unless it carries a valid identity cookie; on
/// success the decoded claims are attached to the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let claims = claims_from_request(&req, &state.config.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// [`require_auth`] plus an admin role check.  Wired onto the mutation
/// routes when the instance closes contributions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let claims = claims_from_request(&req, &state.config.jwt_secret)?;
    if claims.role != Role::Admin {
        return Err(ServerError::Forbidden);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Extract and verify the identity cookie.  Absence, expiry, and forgery
/// all collapse into the same `Unauthorized` answer.
fn claims_from_request(req: &Request, secret: &str) -> Result<AuthClaims, ServerError> {
    let header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();

    let jwt = Cookie::split_parse(header)
        .filter_map(|parsed| parsed.ok())
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ServerError::Unauthorized)?;

    token::verify(&jwt, secret).map_err(|_| ServerError::Unauthorized)
}

// ---------------------------------------------------------------------------
// Cookies
// ---------------------------------------------------------------------------

/// The identity cookie: httpOnly, site-wide, expiring with the token.
fn session_cookie(value: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::seconds(max_age_secs))
        .build()
}

/// An immediately-expiring cookie that overwrites the identity cookie.
fn removal_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), 3600, false);
        assert_eq!(cookie.name(), "token");
        assert!(cookie.http_only().unwrap());
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::seconds(3600)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie(true);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_unauthorized() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert!(matches!(
            claims_from_request(&req, "secret"),
            Err(ServerError::Unauthorized)
        ));
    }

    #[test]
    fn forged_cookie_is_unauthorized() {
        let req = Request::builder()
            .uri("/")
            .header(header::COOKIE, "token=not-a-jwt; other=1")
            .body(Body::empty())
            .unwrap();
        assert!(matches!(
            claims_from_request(&req, "secret"),
            Err(ServerError::Unauthorized)
        ));
    }

    #[test]
    fn valid_cookie_yields_the_claims() {
        let user = lodge_shared::UserInfo {
            id: Uuid::new_v4(),
            user_name: "alice".into(),
            email: "a@x.com".into(),
            role: Role::Member,
        };
        let jwt = token::issue(&user, "secret", chrono::Duration::hours(1)).unwrap();

        let req = Request::builder()
            .uri("/")
            .header(header::COOKIE, format!("token={jwt}"))
            .body(Body::empty())
            .unwrap();

        let claims = claims_from_request(&req, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "a@x.com");
    }
}
