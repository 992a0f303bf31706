use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;

use crate::config;
use crate::database::{manager, schema};
use crate::logger;
use crate::routes::{self, AppState};

#[derive(Parser)]
#[command(name = "user-crud-api")]
#[command(about = "User CRUD service with filtered, sorted and paginated listing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Create missing tables and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config();
    config.validate().context("invalid configuration")?;
    logger::init(config);

    let pool = manager::connect(&config.database).context("failed to configure database pool")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            schema::migrate(&pool).await.context("migration failed")?;
            info!("Migration complete");
            Ok(())
        }
        Commands::Serve => {
            if config.database.auto_migrate {
                schema::migrate(&pool).await.context("migration failed")?;
            }
            serve(AppState::new(pool)).await
        }
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let config = config::config();
    let port = config.http_port()?;
    let pool = state.pool.clone();
    let app = routes::app(state, &config.app);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        "Starting {} {} in {:?} mode on http://{}",
        config.app.name, config.app.version, config.environment, bind_addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::parse_from(["user-crud-api"]);
        assert_eq!(cli.command, None);
        let cli = Cli::parse_from(["user-crud-api", "migrate"]);
        assert_eq!(cli.command, Some(Commands::Migrate));
    }
}
