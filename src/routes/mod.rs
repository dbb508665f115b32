use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use paddock_user::{Command, SqliteStore};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

mod admin;
mod auth;
mod health;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub command: Command<SqliteStore>,
    /// Read pool, for health checks.
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/api/admin/users/{id}/sessions",
            delete(admin::sign_out_user),
        )
        .route_layer(middleware::from_fn(crate::middleware::admin_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/me", get(auth::me))
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            crate::middleware::auth_middleware,
        ))
        // Reads the cookie itself so it keeps working when session lookups fail.
        .route("/api/auth/signout", post(auth::signout))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
