use clap::ValueEnum;
use paddock_user::{Command, SqliteStore};

#[derive(Clone, Copy, ValueEnum)]
pub enum Role {
    User,
    Driver,
    Admin,
}

impl From<Role> for paddock_shared::user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => Self::User,
            Role::Driver => Self::Driver,
            Role::Admin => Self::Admin,
        }
    }
}

async fn command(config: &paddock::Config) -> anyhow::Result<Command<SqliteStore>> {
    let pool = paddock::db::create_pool(&config.database.url, 1).await?;

    Ok(Command::new(SqliteStore::from(pool)))
}

pub async fn set_role(config: paddock::Config, email: String, role: Role) -> anyhow::Result<()> {
    let command = command(&config).await?;

    let user = match command.set_role(&email, role.into()).await {
        Ok(user) => user,
        Err(paddock_shared::Error::User(msg)) => {
            tracing::error!("{email}: {msg}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("{} is now {}", user.email, user.role);

    Ok(())
}

pub async fn sign_out(config: paddock::Config, email: String) -> anyhow::Result<()> {
    let command = command(&config).await?;

    let deleted = match command.sign_out_user(&email).await {
        Ok(deleted) => deleted,
        Err(paddock_shared::Error::User(msg)) => {
            tracing::error!("{email}: {msg}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!("{email} signed out of {deleted} session(s)");

    Ok(())
}
