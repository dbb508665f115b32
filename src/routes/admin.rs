use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{error::AppResult, middleware::CurrentUser};

use super::AppState;

/// Forced sign-out of every device of user `id`.
pub async fn sign_out_user(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.command.sessions().invalidate_user(&id).await?;

    tracing::info!(admin_id = %admin.id, user_id = %id, deleted, "forced sign-out");

    Ok(Json(json!({ "deleted": deleted })))
}
