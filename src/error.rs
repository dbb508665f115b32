use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] paddock_shared::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status(&self) -> StatusCode {
        use paddock_shared::Error;

        match self {
            Self::Domain(Error::Unauthenticated | Error::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Domain(Error::Forbidden) => StatusCode::FORBIDDEN,
            Self::Domain(Error::Validate(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Domain(Error::User(_)) => StatusCode::BAD_REQUEST,
            Self::Domain(Error::Server(_) | Error::Unknown(_)) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        use paddock_shared::Error;

        match self {
            Self::Domain(Error::Unauthenticated) => "Not authenticated".to_owned(),
            Self::Domain(Error::InvalidCredentials) => "Invalid email or password".to_owned(),
            Self::Domain(Error::Forbidden) => "Forbidden".to_owned(),
            Self::Domain(Error::Validate(e)) => e.to_string(),
            Self::Domain(Error::User(msg)) => msg.to_owned(),
            _ => "Internal server error".to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}
