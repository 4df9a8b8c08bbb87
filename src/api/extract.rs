//! Request extractors shared by the handlers.

use super::AppState;
use crate::core::session::Session;
use crate::errors::Error;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "rawaj_session";

/// JSON body whose decoding errors come back as `{"error": ...}` with status 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// The caller's session, if any.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// A request from a logged-in admin. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

/// Session id carried by the request's cookie, if it parses.
pub fn session_id(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// Cookie handed out on login.
#[must_use]
pub fn session_cookie(id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session on the client.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = match session_id(&jar) {
            Some(id) => state.sessions.touch(id).await,
            None => None,
        };
        Ok(Self(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let CurrentSession(session) = match CurrentSession::from_request_parts(parts, state).await
        {
            Ok(current) => current,
            Err(never) => match never {},
        };
        session.map(Self).ok_or(Error::Unauthorized)
    }
}
