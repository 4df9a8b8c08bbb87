//! Login, logout and session status.

use super::{
    AppState,
    extract::{ApiJson, CurrentSession, removal_cookie, session_cookie, session_id},
};
use crate::{
    core::auth,
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

/// Login payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

/// `POST /api/login` - starts a session and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<Value>)> {
    if request.username.is_none() || request.password.is_none() {
        return Err(Error::MissingCredentials);
    }
    let account = auth::authenticate(
        state.db()?,
        request.username.as_deref(),
        request.password.as_deref(),
    )
    .await?;

    // A client logging in again gets a fresh id.
    if let Some(previous) = session_id(&jar) {
        state.sessions.invalidate(previous).await;
    }
    let session = state.sessions.create(&account.username, &account.role).await;

    Ok((
        jar.add(session_cookie(session.id)),
        Json(json!({ "message": "Login successful", "username": account.username })),
    ))
}

/// `POST /api/logout` - always succeeds.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    if let Some(id) = session_id(&jar) {
        state.sessions.invalidate(id).await;
    }
    (
        jar.remove(removal_cookie()),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

/// `GET /api/check-auth`
pub async fn check_auth(CurrentSession(session): CurrentSession) -> Json<Value> {
    match session {
        Some(session) => Json(json!({ "authenticated": true, "username": session.username })),
        None => Json(json!({ "authenticated": false })),
    }
}
