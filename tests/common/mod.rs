use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use paddock::{
    AppState,
    config::{AuthConfig, Config, DatabaseConfig, ObservabilityConfig, ServerConfig},
};
use paddock_user::{Command, RegisterInput, SqliteStore, User};
use serde_json::Value;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub command: Command<SqliteStore>,
}

pub async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    paddock_db::migrate(&pool).await.unwrap();

    pool
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            secure_cookie: false,
        },
        root: None,
        observability: ObservabilityConfig::default(),
    }
}

pub async fn create_test_app(pool: SqlitePool) -> TestApp {
    let command = Command::new(SqliteStore::from(pool.clone()));
    let state = AppState {
        config: test_config(),
        command: command.clone(),
        pool: pool.clone(),
    };

    TestApp {
        router: paddock::router(state),
        pool,
        command,
    }
}

#[allow(dead_code)]
impl TestApp {
    pub async fn register(&self, name: &str) -> User {
        self.command
            .register(RegisterInput {
                email: format!("{name}@paddock.localhost"),
                password: "my_password".to_owned(),
                first_name: Some(name.to_owned()),
                last_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<axum::body::Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signs in over HTTP and returns the session token from the cookie.
    pub async fn login(&self, name: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({
                    "email": format!("{name}@paddock.localhost"),
                    "password": "my_password",
                }),
            ))
            .await;

        session_token(&response).unwrap()
    }

    pub async fn me(&self, token: &str) -> Response<axum::body::Body> {
        self.send(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::COOKIE, format!("session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn session_count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM session")
            .fetch_one(&self.pool)
            .await
            .unwrap();

        count
    }
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();

    serde_json::from_slice(&body).unwrap()
}

/// Raw `Set-Cookie` header for the session cookie, if any.
#[allow(dead_code)]
pub fn session_set_cookie(response: &Response<axum::body::Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .map(str::to_owned)
}

#[allow(dead_code)]
pub fn session_token(response: &Response<axum::body::Body>) -> Option<String> {
    let cookie = session_set_cookie(response)?;
    let pair = cookie.split(';').next()?;

    pair.strip_prefix("session=").map(str::to_owned)
}
