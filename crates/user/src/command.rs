use paddock_shared::user::Role;
use validator::Validate;

use crate::{
    NewUser, Session, SessionManager, Store, User,
    clock::{Clock, SystemClock},
    normalize_email, password,
};

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
}

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// A successful sign-in: the token for the cookie plus what it points to.
#[derive(Debug)]
pub struct LoggedIn {
    pub token: String,
    pub session: Session,
    pub user: User,
}

/// Account operations on top of a [`Store`] and its [`SessionManager`].
#[derive(Clone)]
pub struct Command<S, C = SystemClock> {
    sessions: SessionManager<S, C>,
}

impl<S: Store> Command<S> {
    pub fn new(store: S) -> Self {
        Self {
            sessions: SessionManager::new(store),
        }
    }
}

impl<S: Store, C: Clock> Command<S, C> {
    pub fn with_sessions(sessions: SessionManager<S, C>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &SessionManager<S, C> {
        &self.sessions
    }

    fn store(&self) -> &S {
        self.sessions.store()
    }

    pub async fn get_user_by_email(&self, email: &str) -> paddock_shared::Result<Option<User>> {
        self.store().get_user_by_email(&normalize_email(email)).await
    }

    pub async fn register(&self, input: RegisterInput) -> paddock_shared::Result<User> {
        input.validate()?;

        let email = normalize_email(&input.email);

        if self.store().get_user_by_email(&email).await?.is_some() {
            paddock_shared::user!("Email already exists");
        }

        let user = self
            .store()
            .create_user(NewUser {
                email,
                password: password::hash(&input.password)?,
                first_name: non_empty(input.first_name),
                last_name: non_empty(input.last_name),
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");

        Ok(user)
    }

    /// Checks credentials and opens a session. An unknown email and a wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> paddock_shared::Result<LoggedIn> {
        let email = normalize_email(&input.email);

        let Some(user) = self.store().get_user_by_email(&email).await? else {
            password::verify_dummy(&input.password);
            tracing::debug!("login rejected");

            return Err(paddock_shared::Error::InvalidCredentials);
        };

        if !password::verify(&input.password, &user.password) {
            tracing::debug!(user_id = %user.id, "login rejected");

            return Err(paddock_shared::Error::InvalidCredentials);
        }

        let (token, session) = self.sessions.issue(&user.id).await?;

        tracing::info!(user_id = %user.id, "user logged in");

        Ok(LoggedIn {
            token,
            session,
            user,
        })
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.invalidate_token(token).await;
    }

    pub async fn set_role(&self, email: &str, role: Role) -> paddock_shared::Result<User> {
        let Some(mut user) = self.get_user_by_email(email).await? else {
            paddock_shared::user!("User not found");
        };

        self.store().set_user_role(&user.id, role).await?;
        user.role = role;

        tracing::info!(user_id = %user.id, role = %role, "user role updated");

        Ok(user)
    }

    /// Forced sign-out from every device, looked up by email.
    pub async fn sign_out_user(&self, email: &str) -> paddock_shared::Result<u64> {
        let Some(user) = self.get_user_by_email(email).await? else {
            paddock_shared::user!("User not found");
        };

        self.sessions.invalidate_user(&user.id).await
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
