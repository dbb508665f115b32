use paddock_shared::user::Role;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub created_at: i64,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.to_owned(),
            email: self.email.to_owned(),
            first_name: self.first_name.to_owned(),
            last_name: self.last_name.to_owned(),
            role: self.role,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

/// Server-side record of a signed-in browser. `id` is the digest of the
/// client's token, never the token itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Milliseconds since the Unix epoch.
    pub expires_at: i64,
}

/// What downstream handlers get to know about the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn can_write(&self) -> bool {
        self.role.can_write()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Email as stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
