mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use paddock_shared::user::Role;

use crate::{NewUser, Session, User, token};

/// Persistence for users and sessions. Lookups return `Ok(None)` for a
/// missing row; updates and deletes of a missing row are no-ops.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> paddock_shared::Result<User>;

    async fn get_user_by_id(&self, id: &str) -> paddock_shared::Result<Option<User>>;

    /// Expects an already normalized email.
    async fn get_user_by_email(&self, email: &str) -> paddock_shared::Result<Option<User>>;

    async fn set_user_role(&self, id: &str, role: Role) -> paddock_shared::Result<()>;

    /// Session and its owner in a single read.
    async fn get_session_with_user(
        &self,
        id: &str,
    ) -> paddock_shared::Result<Option<(Session, User)>>;

    async fn create_session(&self, session: &Session) -> paddock_shared::Result<()>;

    async fn update_session_expiry(&self, id: &str, expires_at: i64)
    -> paddock_shared::Result<()>;

    async fn delete_session(&self, id: &str) -> paddock_shared::Result<()>;

    async fn delete_user_sessions(&self, user_id: &str) -> paddock_shared::Result<u64>;

    /// Removes every session with `expires_at <= now`.
    async fn delete_expired_sessions(&self, now: i64) -> paddock_shared::Result<u64>;

    /// Delete that never fails the caller.
    async fn discard_session(&self, id: &str) {
        if let Err(e) = self.delete_session(id).await {
            tracing::warn!(
                session = token::short_id(id),
                error = %e,
                "failed to delete session"
            );
        }
    }
}
