use anyhow::Result;
use paddock_shared::user::Role;
use paddock_user::{Command, RegisterInput, SqliteStore};

use crate::{config::Config, routes::AppState};

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("starting paddock server");

    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    let write_pool = crate::db::create_write_pool(&config.database.url).await?;
    paddock_db::migrate(&write_pool).await?;

    let read_pool =
        crate::db::create_read_pool(&config.database.url, config.database.max_connections).await?;

    let command = Command::new(SqliteStore::new(read_pool.clone(), write_pool.clone()));

    ensure_root(&command, &config).await?;

    let state = AppState {
        config,
        command,
        pool: read_pool.clone(),
    };

    let app = crate::routes::router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("closing database pools");
    read_pool.close().await;
    write_pool.close().await;

    tracing::info!("graceful shutdown complete");

    Ok(())
}

/// Creates the configured root account, or promotes it if it lost the
/// admin role.
pub async fn ensure_root(command: &Command<SqliteStore>, config: &Config) -> Result<()> {
    let Some(root) = &config.root else {
        return Ok(());
    };

    match command.get_user_by_email(&root.email).await? {
        Some(user) if user.role.is_admin() => {}
        Some(_) => {
            command.set_role(&root.email, Role::Admin).await?;
        }
        None => {
            command
                .register(RegisterInput {
                    email: root.email.to_owned(),
                    password: root.password.to_owned(),
                    first_name: None,
                    last_name: None,
                })
                .await?;
            command.set_role(&root.email, Role::Admin).await?;

            tracing::info!(email = %root.email, "root user created");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("received SIGTERM signal");
        },
    }

    tracing::info!("starting graceful shutdown");
}
