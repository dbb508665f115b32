use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use paddock_user::{Identity, LoginInput, RegisterInput};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::{SESSION_COOKIE, removal_cookie, session_cookie},
    error::AppResult,
    middleware::CurrentUser,
};

use super::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> AppResult<impl IntoResponse> {
    let logged_in = state
        .command
        .login(LoginInput {
            email: form.email,
            password: form.password,
        })
        .await?;

    let cookie = session_cookie(logged_in.token, state.config.auth.secure_cookie);

    Ok((jar.add(cookie), Json(json!({ "success": true }))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupForm>,
) -> AppResult<impl IntoResponse> {
    state
        .command
        .register(RegisterInput {
            email: form.email,
            password: form.password,
            first_name: form.first_name,
            last_name: form.last_name,
        })
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Always succeeds: whatever session the cookie named is gone afterwards and
/// the browser is told to forget the cookie.
pub async fn signout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.command.logout(cookie.value()).await;
        tracing::debug!("session cookie cleared");
    }

    let jar = jar.add(removal_cookie(state.config.auth.secure_cookie));

    (StatusCode::SEE_OTHER, [(LOCATION, "/")], jar)
}

pub async fn me(CurrentUser(identity): CurrentUser) -> Json<Identity> {
    Json(identity)
}
