use sqlx::SqlitePool;
use sqlx_migrator::{Info, Migrate, Migrator, Plan};

mod m0001;
pub mod table;

pub fn migrator() -> Result<Migrator<sqlx::Sqlite>, sqlx_migrator::Error> {
    let mut migrator = Migrator::default();
    migrator.add_migrations(vec![Box::new(m0001::Migration)])?;

    Ok(migrator)
}

/// Apply every pending migration. Already applied ones are skipped.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    let migrator = migrator()?;
    let mut conn = pool.acquire().await?;
    migrator.run(&mut *conn, &Plan::apply_all()).await?;

    tracing::debug!("database schema up to date");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_migrate_creates_user_and_session_tables() {
        let pool = memory_pool().await;
        migrate(&pool).await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();

        assert!(names.contains(&"user"));
        assert!(names.contains(&"session"));
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = memory_pool().await;
        migrate(&pool).await.unwrap();
        migrate(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_email_unique_ignores_case() {
        let pool = memory_pool().await;
        migrate(&pool).await.unwrap();

        let insert = r#"INSERT INTO "user" (id, email, password, role, created_at) VALUES (?1, ?2, 'x', 'USER', 0)"#;
        sqlx::query(insert)
            .bind("01HZZZZZZZZZZZZZZZZZZZZZZ1")
            .bind("driver@paddock.test")
            .execute(&pool)
            .await
            .unwrap();

        let duplicate = sqlx::query(insert)
            .bind("01HZZZZZZZZZZZZZZZZZZZZZZ2")
            .bind("Driver@Paddock.test")
            .execute(&pool)
            .await;

        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_file_database_keeps_schema_between_pools() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("paddock.db");
        let url = format!("sqlite:{}", path.display());

        let options = SqliteConnectOptions::from_str(&url)
            .unwrap()
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options.clone()).await.unwrap();
        migrate(&pool).await.unwrap();
        pool.close().await;

        let pool = SqlitePool::connect_with(options).await.unwrap();
        let count: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "session""#)
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(count.0, 0);
    }
}
