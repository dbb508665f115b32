use async_trait::async_trait;
use paddock_db::table;
use paddock_shared::user::Role;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;
use ulid::Ulid;

use crate::{NewUser, Session, User};

use super::Store;

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    role: sqlx::types::Text<Role>,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role.0,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct SessionUserRow {
    session_id: String,
    expires_at: i64,
    #[sqlx(flatten)]
    user: UserRow,
}

const USER_COLUMNS: [table::User; 7] = [
    table::User::Id,
    table::User::Email,
    table::User::Password,
    table::User::FirstName,
    table::User::LastName,
    table::User::Role,
    table::User::CreatedAt,
];

const SESSION_WITH_USER: &str = r#"SELECT
    s.id AS session_id,
    s.expires_at,
    u.id,
    u.email,
    u.password,
    u.first_name,
    u.last_name,
    u.role,
    u.created_at
FROM session s
INNER JOIN user u ON u.id = s.user_id
WHERE s.id = ?
LIMIT 1"#;

/// Reads go to `read_db`, every statement that mutates goes to `write_db`.
#[derive(Clone)]
pub struct SqliteStore {
    read_db: SqlitePool,
    write_db: SqlitePool,
}

impl SqliteStore {
    pub fn new(read_db: SqlitePool, write_db: SqlitePool) -> Self {
        Self { read_db, write_db }
    }

    async fn find_user(
        &self,
        column: table::User,
        value: &str,
    ) -> paddock_shared::Result<Option<User>> {
        let statement = Query::select()
            .columns(USER_COLUMNS)
            .from(table::User::Table)
            .and_where(Expr::col(column).eq(value))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
            .map(Into::into))
    }
}

impl From<SqlitePool> for SqliteStore {
    fn from(pool: SqlitePool) -> Self {
        Self::new(pool.clone(), pool)
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn create_user(&self, input: NewUser) -> paddock_shared::Result<User> {
        let user = User {
            id: Ulid::new().to_string(),
            email: input.email,
            password: input.password,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        };

        let statement = Query::insert()
            .into_table(table::User::Table)
            .columns(USER_COLUMNS)
            .values_panic([
                user.id.to_owned().into(),
                user.email.to_owned().into(),
                user.password.to_owned().into(),
                user.first_name.to_owned().into(),
                user.last_name.to_owned().into(),
                user.role.to_string().into(),
                user.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                paddock_shared::user!("Email already exists")
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_id(&self, id: &str) -> paddock_shared::Result<Option<User>> {
        self.find_user(table::User::Id, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> paddock_shared::Result<Option<User>> {
        self.find_user(table::User::Email, email).await
    }

    async fn set_user_role(&self, id: &str, role: Role) -> paddock_shared::Result<()> {
        let statement = Query::update()
            .table(table::User::Table)
            .value(table::User::Role, role.as_ref())
            .and_where(Expr::col(table::User::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    async fn get_session_with_user(
        &self,
        id: &str,
    ) -> paddock_shared::Result<Option<(Session, User)>> {
        let row = sqlx::query_as::<_, SessionUserRow>(SESSION_WITH_USER)
            .bind(id)
            .fetch_optional(&self.read_db)
            .await?;

        Ok(row.map(|row| {
            let session = Session {
                id: row.session_id,
                user_id: row.user.id.to_owned(),
                expires_at: row.expires_at,
            };

            (session, row.user.into())
        }))
    }

    async fn create_session(&self, session: &Session) -> paddock_shared::Result<()> {
        let statement = Query::insert()
            .into_table(table::Session::Table)
            .columns([
                table::Session::Id,
                table::Session::UserId,
                table::Session::ExpiresAt,
            ])
            .values_panic([
                session.id.to_owned().into(),
                session.user_id.to_owned().into(),
                session.expires_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    async fn update_session_expiry(
        &self,
        id: &str,
        expires_at: i64,
    ) -> paddock_shared::Result<()> {
        let statement = Query::update()
            .table(table::Session::Table)
            .value(table::Session::ExpiresAt, expires_at)
            .and_where(Expr::col(table::Session::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    async fn delete_session(&self, id: &str) -> paddock_shared::Result<()> {
        let statement = Query::delete()
            .from_table(table::Session::Table)
            .and_where(Expr::col(table::Session::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &str) -> paddock_shared::Result<u64> {
        let statement = Query::delete()
            .from_table(table::Session::Table)
            .and_where(Expr::col(table::Session::UserId).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(result.rows_affected())
    }

    async fn delete_expired_sessions(&self, now: i64) -> paddock_shared::Result<u64> {
        let statement = Query::delete()
            .from_table(table::Session::Table)
            .and_where(Expr::col(table::Session::ExpiresAt).lte(now))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.write_db).await?;

        Ok(result.rows_affected())
    }
}
