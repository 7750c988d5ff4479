//! Cookie-backed session handle used by every route.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use checklist_core::ids::SessionId;
use checklist_store::SessionData;
use tracing::debug;

use crate::error::AppError;
use crate::server::AppState;

/// A request's working copy of its session.
///
/// Loaded from the store when extracted; nothing is written back until
/// [`Session::commit`] is called.
pub struct Session {
    pub id: SessionId,
    pub data: SessionData,
    jar: CookieJar,
    /// Set when the request carried no usable cookie.
    fresh: bool,
}

impl Session {
    /// Resolve the session from the request cookies. A missing or malformed
    /// cookie yields a fresh id; the cookie for it is only issued on commit.
    pub fn open(state: &AppState, jar: CookieJar) -> Result<Self, AppError> {
        let existing = jar
            .get(&state.config.cookie_name)
            .and_then(|cookie| cookie.value().parse::<SessionId>().ok());

        match existing {
            Some(id) => {
                let data = state.store.get(&id)?;
                Ok(Self {
                    id,
                    data,
                    jar,
                    fresh: false,
                })
            }
            None => Ok(Self {
                id: SessionId::new(),
                data: SessionData::default(),
                jar,
                fresh: true,
            }),
        }
    }

    /// Write the session back and hand over the cookie jar for the response.
    ///
    /// Empty sessions hold no store slot: a fresh one is dropped without a
    /// cookie, an existing one is removed from the store.
    pub fn commit(self, state: &AppState) -> Result<CookieJar, AppError> {
        if self.data == SessionData::default() {
            if !self.fresh {
                let _ = state.store.remove(&self.id)?;
            }
            return Ok(self.jar);
        }

        state.store.put(&self.id, self.data)?;
        if !self.fresh {
            return Ok(self.jar);
        }

        debug!(session_id = %self.id, "starting new session");
        let cookie = Cookie::build((state.config.cookie_name.clone(), self.id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        Ok(self.jar.add(cookie))
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Self::open(state, CookieJar::from_headers(&parts.headers))
    }
}
