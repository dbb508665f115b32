use crate::{
    Session, Store, User,
    clock::{Clock, DAY, SystemClock},
    token,
};

/// How long a freshly issued or renewed session lives.
pub const SESSION_LIFETIME: i64 = 30 * DAY;

/// Once this little time is left, the next validation slides the expiry.
pub const RENEWAL_THRESHOLD: i64 = 15 * DAY;

/// A session that passed validation together with its owner.
#[derive(Clone, Debug)]
pub struct Authenticated {
    pub session: Session,
    pub user: User,
    /// The expiry moved forward during this validation.
    pub renewed: bool,
}

#[derive(Clone)]
pub struct SessionManager<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: Store> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: Store, C: Clock> SessionManager<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Starts a session for `user_id`. The returned token goes to the client
    /// and is not kept anywhere on this side.
    pub async fn issue(&self, user_id: &str) -> paddock_shared::Result<(String, Session)> {
        let token = token::generate_token();
        let session = Session {
            id: token::session_id(&token),
            user_id: user_id.to_owned(),
            expires_at: self.clock.now() + SESSION_LIFETIME,
        };

        self.store.create_session(&session).await?;

        tracing::debug!(
            session = token::short_id(&session.id),
            user_id = %session.user_id,
            "session issued"
        );

        Ok((token, session))
    }

    /// Resolves a client token. Unknown and expired tokens yield `Ok(None)`
    /// and their row, if any, is removed.
    pub async fn validate(&self, token: &str) -> paddock_shared::Result<Option<Authenticated>> {
        let id = token::session_id(token);
        let now = self.clock.now();

        let Some((mut session, user)) = self.store.get_session_with_user(&id).await? else {
            self.store.discard_session(&id).await;

            return Ok(None);
        };

        if now >= session.expires_at {
            tracing::debug!(session = token::short_id(&id), "session expired");
            self.store.discard_session(&id).await;

            return Ok(None);
        }

        let mut renewed = false;

        if now >= session.expires_at - RENEWAL_THRESHOLD {
            session.expires_at = now + SESSION_LIFETIME;
            self.store
                .update_session_expiry(&session.id, session.expires_at)
                .await?;
            renewed = true;

            tracing::debug!(session = token::short_id(&id), "session renewed");
        }

        Ok(Some(Authenticated {
            session,
            user,
            renewed,
        }))
    }

    pub async fn invalidate(&self, session_id: &str) {
        self.store.discard_session(session_id).await;
    }

    pub async fn invalidate_token(&self, token: &str) {
        self.invalidate(&token::session_id(token)).await;
    }

    /// Signs the user out everywhere.
    pub async fn invalidate_user(&self, user_id: &str) -> paddock_shared::Result<u64> {
        let deleted = self.store.delete_user_sessions(user_id).await?;

        tracing::info!(user_id, deleted, "user sessions invalidated");

        Ok(deleted)
    }

    pub async fn prune(&self) -> paddock_shared::Result<u64> {
        let deleted = self.store.delete_expired_sessions(self.clock.now()).await?;

        tracing::info!(deleted, "expired sessions pruned");

        Ok(deleted)
    }
}
