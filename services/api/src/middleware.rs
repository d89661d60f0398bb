//! Session authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};

use crate::{
    error::ApiError,
    session::{SESSION_COOKIE, Session},
    state::AppState,
};

/// Request-scoped identity, inserted into request extensions by [`session_context`]
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub session: Option<Session>,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Resolve the session cookie into an [`AuthContext`] for every request
///
/// A session store failure is logged and the request carries on unauthenticated.
pub async fn session_context(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let session = match jar.get(SESSION_COOKIE) {
        Some(cookie) => match state.sessions.get_session(cookie.value()).await {
            Ok(session) => session,
            Err(e) => {
                error!("Failed to load session: {}", e);
                None
            }
        },
        None => None,
    };

    req.extensions_mut().insert(AuthContext { session });
    next.run(req).await
}

/// Reject requests that carry no authenticated session
pub async fn require_auth(req: Request, next: Next) -> Result<Response, ApiError> {
    let authenticated = req
        .extensions()
        .get::<AuthContext>()
        .is_some_and(AuthContext::is_authenticated);

    if !authenticated {
        debug!("Rejecting unauthenticated {} {}", req.method(), req.uri());
        return Err(ApiError::Unauthenticated);
    }

    Ok(next.run(req).await)
}
