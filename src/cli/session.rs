use paddock_user::{SessionManager, SqliteStore};

/// Deletes sessions past their expiry. Safe to run at any time.
pub async fn prune(config: paddock::Config) -> anyhow::Result<()> {
    let pool = paddock::db::create_pool(&config.database.url, 1).await?;
    let sessions = SessionManager::new(SqliteStore::from(pool.clone()));

    let deleted = sessions.prune().await?;
    pool.close().await;

    tracing::info!("pruned {deleted} expired session(s)");

    Ok(())
}
