use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use paddock_shared::Error;
use paddock_user::Identity;

use crate::error::AppError;

/// Lets only admins through. Runs after [`super::auth_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let Some(identity) = request.extensions().get::<Identity>() else {
        return AppError::from(Error::Unauthenticated).into_response();
    };

    if !identity.is_admin() {
        tracing::warn!(
            user_id = %identity.id,
            "non-admin user attempted to access admin route"
        );

        return AppError::from(Error::Forbidden).into_response();
    }

    next.run(request).await
}
