use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use paddock_user::{Identity, token};

use crate::{
    auth::{SESSION_COOKIE, session_cookie},
    error::AppError,
    routes::AppState,
};

/// Resolves the `session` cookie into an [`Identity`] request extension.
///
/// Never turns a request away for a bad or stale token; such requests simply
/// continue anonymous. When validation slid the expiry forward the cookie is
/// sent again so the browser keeps it as long as the server does.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return next.run(req).await;
    };

    let auth = match state.command.sessions().validate(&token).await {
        Ok(Some(auth)) => auth,
        Ok(None) => return next.run(req).await,
        Err(e) => {
            tracing::error!(error = %e, "session validation failed");

            return AppError::from(e).into_response();
        }
    };

    req.extensions_mut().insert(auth.user.identity());

    let response = next.run(req).await;

    if !auth.renewed || sets_session_cookie(&response) {
        return response;
    }

    tracing::debug!(
        session = token::short_id(&auth.session.id),
        "session cookie refreshed"
    );

    let secure = state.config.auth.secure_cookie;
    (jar.add(session_cookie(token, secure)), response).into_response()
}

/// The handler already decided what the cookie should be, e.g. on sign-out.
fn sets_session_cookie(response: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");

    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|value| value.to_str().is_ok_and(|v| v.starts_with(&prefix)))
}

/// The signed-in caller. Rejects anonymous requests with 401.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Domain(paddock_shared::Error::Unauthenticated))
    }
}

/// The caller if signed in. Never rejects.
#[derive(Clone, Debug)]
pub struct MaybeUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Identity>().cloned()))
    }
}
